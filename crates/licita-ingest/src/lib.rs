//! Licita Ingest — file validation and text extraction for document files.
//!
//! The compliance core never touches raw files directly: everything enters
//! through the validation gate and the extraction contract defined here.
//! PDF parsing and OCR are external collaborators; their output reaches the
//! core either as a `.txt` sidecar or not at all, in which case
//! classification degrades to filename heuristics.

pub mod extract;
pub mod sanitize;
pub mod validate;

pub use extract::{content_hash, extract_text, ExtractedText, ExtractionMethod};
pub use sanitize::{sanitize_filename, sanitize_text};
pub use validate::validate_file;
