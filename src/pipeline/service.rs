//! Summarization service coordinating windowing, parallel chunk
//! summarization, and ordered reduction.

use std::sync::Arc;

use crate::{completion::CompletionClient, config::Config, metrics::SummaryMetrics};

use super::{
    dispatch::dispatch,
    map::{self, DEFAULT_SYSTEM_INSTRUCTION},
    reduce,
    types::{Chunk, PipelineError, SummaryOutcome},
    window::window,
};

/// Tunable parameters for one summarizer instance.
#[derive(Debug, Clone)]
pub struct SummarizerOptions {
    /// Window size in characters for the map phase.
    pub window_size: usize,
    /// Overlap in characters between consecutive windows.
    pub overlap_size: usize,
    /// Sampling temperature forwarded with every completion call.
    pub temperature: f32,
    /// System instruction sent with every completion call.
    pub system_instruction: String,
}

impl SummarizerOptions {
    /// Derive options from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            window_size: config.window_size,
            overlap_size: config.overlap_size,
            temperature: config.temperature,
            system_instruction: config
                .system_instruction
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string()),
        }
    }
}

/// Coordinates the full map-reduce summarization pipeline.
///
/// The service owns the completion client handle and a metrics registry and
/// is shared through an `Arc` by any surface that needs it. Each parallel
/// chunk task starts from an empty running context; summaries of sibling
/// chunks are never threaded into one another, which is what keeps the map
/// phase embarrassingly parallel.
pub struct Summarizer {
    client: Arc<dyn CompletionClient + Send + Sync>,
    options: SummarizerOptions,
    metrics: Arc<SummaryMetrics>,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Summarizer {
    /// Build a summarizer, validating the window configuration upfront.
    pub fn new(
        client: Arc<dyn CompletionClient + Send + Sync>,
        options: SummarizerOptions,
    ) -> Result<Self, PipelineError> {
        if options.window_size == 0 || options.overlap_size >= options.window_size {
            return Err(PipelineError::InvalidWindow {
                window_size: options.window_size,
                overlap_size: options.overlap_size,
            });
        }
        Ok(Self {
            client,
            options,
            metrics: Arc::new(SummaryMetrics::new()),
        })
    }

    /// Whether the document fits within a single window.
    pub fn fits_single_window(&self, document: &str) -> bool {
        document.chars().count() <= self.options.window_size
    }

    /// Summarize a document with the map-reduce pipeline.
    ///
    /// The document is split into overlapping windows, each window is
    /// summarized by its own concurrent task, and the partial summaries are
    /// reduced in document order with one final completion call. An empty
    /// document is a no-op success: no completion call is made and the
    /// returned summary is empty. Any single failed completion call fails
    /// the whole invocation; partial summaries are discarded.
    pub async fn map_reduce(&self, document: &str) -> Result<SummaryOutcome, PipelineError> {
        if document.is_empty() {
            tracing::debug!("Empty document; nothing to summarize");
            return Ok(SummaryOutcome {
                summary: String::new(),
                chunk_count: 0,
                completion_calls: 0,
            });
        }

        let chunks = window(document, self.options.window_size, self.options.overlap_size)?;
        let chunk_count = chunks.len();
        tracing::info!(chunks = chunk_count, "Dispatching chunk summarization");

        let tasks: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                let client = Arc::clone(&self.client);
                let system_instruction = self.options.system_instruction.clone();
                let temperature = self.options.temperature;
                async move {
                    map::summarize_chunk(
                        client.as_ref(),
                        &chunk,
                        None,
                        &system_instruction,
                        temperature,
                    )
                    .await
                }
            })
            .collect();

        let results = dispatch(tasks).await?;
        let summary = reduce::reduce(
            self.client.as_ref(),
            &results,
            &self.options.system_instruction,
            self.options.temperature,
        )
        .await?;

        let completion_calls = chunk_count + 1;
        self.metrics.record_document(chunk_count as u64);
        self.metrics.record_completion_calls(completion_calls as u64);
        tracing::info!(
            chunks = chunk_count,
            completion_calls,
            summary_chars = summary.chars().count(),
            "Document summarized"
        );

        Ok(SummaryOutcome {
            summary,
            chunk_count,
            completion_calls,
        })
    }

    /// Summarize a document with a single completion call.
    ///
    /// Baseline path for documents small enough to fit in one call: the
    /// whole document is embedded in one prompt and no windowing, dispatch,
    /// or reduction happens.
    pub async fn stuff(&self, document: &str) -> Result<SummaryOutcome, PipelineError> {
        if document.is_empty() {
            tracing::debug!("Empty document; nothing to summarize");
            return Ok(SummaryOutcome {
                summary: String::new(),
                chunk_count: 0,
                completion_calls: 0,
            });
        }

        let whole = Chunk {
            index: 0,
            start: 0,
            end: document.chars().count(),
            text: document.to_string(),
        };
        let partial = map::summarize_chunk(
            self.client.as_ref(),
            &whole,
            None,
            &self.options.system_instruction,
            self.options.temperature,
        )
        .await?;

        self.metrics.record_document(1);
        self.metrics.record_completion_calls(1);
        tracing::info!(
            summary_chars = partial.text.chars().count(),
            "Document summarized (stuffing)"
        );

        Ok(SummaryOutcome {
            summary: partial.text,
            chunk_count: 1,
            completion_calls: 1,
        })
    }

    /// Return the current metrics snapshot.
    pub fn metrics_snapshot(&self) -> crate::metrics::MetricsSnapshot {
        self.metrics.snapshot()
    }
}
