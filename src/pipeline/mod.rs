//! Map-reduce summarization pipeline: windowing, parallel chunk
//! summarization, and ordered reduction.

mod dispatch;
mod map;
mod reduce;
mod service;
pub mod types;
pub mod window;

pub use service::{Summarizer, SummarizerOptions};
pub use types::{Chunk, PartialSummary, PipelineError, ResultSet, SummaryOutcome};
pub use window::window;
