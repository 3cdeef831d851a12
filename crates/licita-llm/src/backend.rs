//! Backend trait and explicit outcome type.

/// Outcome of a language-model call.
///
/// `Unavailable` covers transport and server failures; `Malformed` covers
/// responses the caller could not parse. Both are ordinary fallback
/// branches for callers, never panics or propagated errors.
#[derive(Debug, Clone)]
pub enum LlmOutcome<T> {
    Ok(T),
    Unavailable(String),
    Malformed(String),
}

impl<T> LlmOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            _ => None,
        }
    }
}

/// A language-model backend usable for text and strict-JSON generation.
///
/// Synchronous by contract — the compliance core is single-threaded and
/// sequential; slow calls are the backend's concern, tolerated through the
/// callers' fallback paths.
pub trait LlmBackend: Send + Sync {
    /// Generate free text from a prompt.
    fn generate(&self, prompt: &str) -> LlmOutcome<String>;

    /// Generate and parse a strict-JSON response.
    fn generate_json(&self, prompt: &str) -> LlmOutcome<serde_json::Value>;

    /// Whether the backend can currently serve requests.
    fn is_available(&self) -> bool;
}

/// Backend that is never available. Offline/test substitute.
pub struct NoopBackend;

impl LlmBackend for NoopBackend {
    fn generate(&self, _prompt: &str) -> LlmOutcome<String> {
        LlmOutcome::Unavailable("no backend configured".into())
    }

    fn generate_json(&self, _prompt: &str) -> LlmOutcome<serde_json::Value> {
        LlmOutcome::Unavailable("no backend configured".into())
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Strip Markdown code fences around a JSON payload.
///
/// Local models frequently wrap JSON in ```json fences despite being told
/// not to.
pub(crate) fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    if let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    {
        if let Some(body) = inner.rsplit_once("```") {
            return body.0.trim();
        }
        return inner.trim();
    }
    trimmed
}
