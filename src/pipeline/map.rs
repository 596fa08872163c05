//! Per-chunk summarization: prompt assembly and the single completion call.

use crate::completion::CompletionClient;

use super::types::{Chunk, PartialSummary, PipelineError};

/// Default system instruction, overridable through configuration.
pub(crate) const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are a helpful AI assistant that helps people summarize information.";

/// Build the user prompt for one chunk.
///
/// Two templates exist: a fresh-chunk template and a variant that embeds a
/// running context ahead of the chunk text. In the parallel path every chunk
/// task starts from an empty context, so the context-carrying template is
/// only reachable when a caller supplies one explicitly.
pub(crate) fn build_chunk_prompt(chunk: &Chunk, running_context: Option<&str>) -> String {
    match running_context.filter(|context| !context.trim().is_empty()) {
        Some(context) => format!(
            "Taking the following context into consideration:\n\
             CONTEXT: {context}\n\
             please provide a concise summary covering the key points of the following text.\n\
             TEXT: {text}\n\
             SUMMARY:",
            text = chunk.text
        ),
        None => format!(
            "Please provide a concise summary covering the key points of the following text.\n\
             TEXT: {text}\n\
             SUMMARY:",
            text = chunk.text
        ),
    }
}

/// Summarize one chunk with exactly one completion call.
///
/// The result carries the chunk's index unchanged so the reducer can restore
/// document order after out-of-order completion.
pub(crate) async fn summarize_chunk(
    client: &dyn CompletionClient,
    chunk: &Chunk,
    running_context: Option<&str>,
    system_instruction: &str,
    temperature: f32,
) -> Result<PartialSummary, PipelineError> {
    let prompt = build_chunk_prompt(chunk, running_context);
    tracing::debug!(
        index = chunk.index,
        start = chunk.start,
        end = chunk.end,
        "Summarizing chunk"
    );
    let text = client
        .complete(Some(system_instruction), &prompt, temperature)
        .await?;
    Ok(PartialSummary {
        index: chunk.index,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, text: &str) -> Chunk {
        Chunk {
            index,
            start: 0,
            end: text.chars().count(),
            text: text.to_string(),
        }
    }

    #[test]
    fn fresh_chunk_prompt_embeds_text_only() {
        let prompt = build_chunk_prompt(&chunk(0, "chapter one"), None);
        assert!(prompt.contains("TEXT: chapter one"));
        assert!(!prompt.contains("CONTEXT:"));
    }

    #[test]
    fn context_prompt_embeds_context_ahead_of_text() {
        let prompt = build_chunk_prompt(&chunk(1, "chapter two"), Some("earlier summary"));
        let context_at = prompt.find("CONTEXT: earlier summary").expect("context");
        let text_at = prompt.find("TEXT: chapter two").expect("text");
        assert!(context_at < text_at);
    }

    #[test]
    fn blank_context_falls_back_to_fresh_template() {
        let prompt = build_chunk_prompt(&chunk(0, "chapter one"), Some("   "));
        assert!(!prompt.contains("CONTEXT:"));
    }
}
