//! Licita LLM — injectable language-model backend for classification and extraction.
//!
//! The backend is a constructor-injected capability, never process-global
//! state; tests substitute [`NoopBackend`] or a scripted stub. Failure is a
//! visible [`LlmOutcome`] variant, not an exception path.

pub mod backend;
pub mod http;
pub mod prompts;

pub use backend::{LlmBackend, LlmOutcome, NoopBackend};
pub use http::HttpBackend;
