//! errorlens - resolve application error screenshots to curated answers.
//!
//! A screenshot of an error dialog is read with OCR, the error message is
//! isolated from the surrounding noise, and the message is fuzzy-matched
//! against a small knowledge base of known errors and their fixes.

pub mod cli;
pub mod config;
pub mod extract;
pub mod knowledge;
pub mod ocr;
pub mod pipeline;
pub mod server;
pub mod text;

pub use extract::ErrorMessageExtractor;
pub use knowledge::{KnowledgeBaseLookup, KnowledgeRecord, LookupError, MatchResult};
pub use pipeline::{Resolution, ResolutionPipeline, ResolutionStatus};
