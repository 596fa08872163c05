//! Core data types and error definitions for the summarization pipeline.

use crate::completion::CompletionError;
use std::collections::BTreeMap;
use thiserror::Error;

/// A bounded, ordered window of the source document.
///
/// Offsets are measured in characters, not bytes, so windowing behaves the
/// same for ASCII and multi-byte text. Chunks are produced in strictly
/// increasing `index` order but may be summarized out of order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in document order, starting at zero.
    pub index: usize,
    /// Character offset of the first character covered by this chunk.
    pub start: usize,
    /// Character offset one past the last character covered by this chunk.
    pub end: usize,
    /// The covered substring of the source document.
    pub text: String,
}

/// Summary of a single chunk, tagged with the originating chunk's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSummary {
    /// Index of the chunk this summary was produced from.
    pub index: usize,
    /// Generated summary text.
    pub text: String,
}

/// Partial summaries keyed by chunk index.
///
/// Insertion order is irrelevant; iteration in ascending key order is what
/// restores document order during reduction.
pub type ResultSet = BTreeMap<usize, PartialSummary>;

/// Result of a completed pipeline invocation.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// The final summary text. Empty when the input document was empty.
    pub summary: String,
    /// Number of chunks the document was split into (zero for an empty
    /// document, one for stuffing mode).
    pub chunk_count: usize,
    /// Number of completion calls issued for this invocation.
    pub completion_calls: usize,
}

/// Errors emitted by the summarization pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Window and overlap sizes describe an impossible stride.
    #[error(
        "invalid window configuration: window_size={window_size}, overlap_size={overlap_size} \
         (overlap must be smaller than the window and the window must be non-zero)"
    )]
    InvalidWindow {
        /// Configured window size in characters.
        window_size: usize,
        /// Configured overlap size in characters.
        overlap_size: usize,
    },
    /// A completion call failed; the whole invocation is abandoned.
    #[error("Completion call failed: {0}")]
    Completion(#[from] CompletionError),
    /// A chunk summarization task panicked or was aborted.
    #[error("Chunk task failed to complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}
