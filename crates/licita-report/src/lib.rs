//! Licita Report — read-only consumers of the compliance report: checklist
//! text, JSON rendering, and the organized submission folder.

pub mod checklist;
pub mod folder;
pub mod json;

pub use checklist::{checklist_text, summary_text};
pub use folder::OutputFolder;
pub use json::report_json;
