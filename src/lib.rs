#![deny(missing_docs)]

//! Core library for the docsum map-reduce summarization pipeline.

/// Completion client abstraction and adapters.
pub mod completion;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Summarization metrics helpers.
pub mod metrics;
/// Document windowing and map-reduce summarization pipeline.
pub mod pipeline;
