//! Licita Notice — reads bid notices (editais) and extracts document requirements.

pub mod corpus;
pub mod patterns;
pub mod reader;
pub mod types;

pub use corpus::{ExampleCorpus, TrainingExample};
pub use reader::{ExtractionMethod, NoticeAnalysis, NoticeReader};
pub use types::BidRequirement;
