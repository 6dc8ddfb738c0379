//! Scribe entity classification worker
//!
//! Extracts a transcript from a media file, classifies it chunk by chunk
//! with the Gemini API, merges the per-chunk documents into one aggregate
//! and persists the result as a JSON file and a database row.

pub mod chunker;
pub mod classifier;
pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod persistence;
pub mod pipeline;
pub mod transcript;

// Re-export main types for easy access
pub use crate::chunker::chunk_text;
pub use crate::classifier::{ChunkClassifier, GeminiClient};
pub use crate::config::Config;
pub use crate::error::{Result, WorkerError};
pub use crate::merge::merge_document;
pub use crate::model::{
    AnalysisRecord, ClassificationDocument, EntityMap, SafetyFlags, Severity, Style, Tone,
};
pub use crate::persistence::{DatabaseWriter, ResultsWriter};
pub use crate::pipeline::{run, run_with_classifier, RunIdentifiers};
pub use crate::transcript::TranscriptExtractor;
