//! OpenAI-compatible chat-completions backend for local model servers
//! (llama.cpp server, LM Studio, vLLM).

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::json;
use tracing::{debug, error};

use crate::backend::{strip_code_fences, LlmBackend, LlmOutcome};

const DEFAULT_MAX_TOKENS: usize = 4096;
// Low temperature keeps structured output stable.
const DEFAULT_TEMPERATURE: f64 = 0.1;

/// HTTP backend against an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: usize,
}

impl HttpBackend {
    /// Create a backend for `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

impl LlmBackend for HttpBackend {
    fn generate(&self, prompt: &str) -> LlmOutcome<String> {
        if prompt.is_empty() {
            return LlmOutcome::Malformed("prompt cannot be empty".into());
        }

        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        debug!(
            "LLM request to {} ({} prompt chars)",
            self.completions_url(),
            prompt.len()
        );

        let response = match self
            .client
            .post(self.completions_url())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
        {
            Ok(r) => r,
            Err(e) => {
                error!("LLM request failed: {}", e);
                return LlmOutcome::Unavailable(format!("request failed: {e}"));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            error!("LLM server error {}: {}", status, text);
            return LlmOutcome::Unavailable(format!("server returned {status}"));
        }

        let parsed: serde_json::Value = match response.json() {
            Ok(v) => v,
            Err(e) => return LlmOutcome::Malformed(format!("invalid response body: {e}")),
        };

        match parsed["choices"][0]["message"]["content"].as_str() {
            Some(content) => LlmOutcome::Ok(content.trim().to_string()),
            None => LlmOutcome::Malformed("response missing message content".into()),
        }
    }

    fn generate_json(&self, prompt: &str) -> LlmOutcome<serde_json::Value> {
        let json_prompt = format!(
            "{prompt}\n\nRespond ONLY with valid JSON. Do not include any explanation or markdown formatting."
        );

        let text = match self.generate(&json_prompt) {
            LlmOutcome::Ok(t) => t,
            LlmOutcome::Unavailable(e) => return LlmOutcome::Unavailable(e),
            LlmOutcome::Malformed(e) => return LlmOutcome::Malformed(e),
        };

        let payload = strip_code_fences(&text);
        match serde_json::from_str(payload) {
            Ok(value) => LlmOutcome::Ok(value),
            Err(e) => {
                debug!("Unparseable LLM JSON: {}", payload);
                LlmOutcome::Malformed(format!("failed to parse JSON response: {e}"))
            }
        }
    }

    fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/v1/models", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
