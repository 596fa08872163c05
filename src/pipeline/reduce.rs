//! Ordered reduction of partial summaries into the final summary.

use crate::completion::CompletionClient;

use super::types::{PipelineError, ResultSet};

/// Join partial summaries in ascending chunk-index order.
///
/// This is the only place document order is restored after the parallel map
/// phase; the result set's key order carries it.
pub(crate) fn combine_in_order(results: &ResultSet) -> String {
    results
        .values()
        .map(|partial| partial.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the final reduction prompt over the combined partial summaries.
///
/// For very large documents the combined context can itself exceed the
/// provider's input limit; the pipeline does not re-chunk it.
pub(crate) fn build_reduce_prompt(combined_context: &str) -> String {
    format!(
        "Please provide an introduction, then a summary of the following text as a maximum of \
         five one-sentence bullet points, then a conclusion.\n\
         TEXT: {combined_context}\n\
         SUMMARY:"
    )
}

/// Reduce the collected partial summaries into one final summary with a
/// single completion call.
pub(crate) async fn reduce(
    client: &dyn CompletionClient,
    results: &ResultSet,
    system_instruction: &str,
    temperature: f32,
) -> Result<String, PipelineError> {
    let combined = combine_in_order(results);
    tracing::debug!(
        partials = results.len(),
        combined_chars = combined.chars().count(),
        "Reducing partial summaries"
    );
    let prompt = build_reduce_prompt(&combined);
    let summary = client
        .complete(Some(system_instruction), &prompt, temperature)
        .await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::PartialSummary;

    #[test]
    fn combines_partials_in_index_order_not_insertion_order() {
        let mut results = ResultSet::new();
        // Inserted in completion order: 2 first, then 0, then 1.
        results.insert(2, PartialSummary { index: 2, text: "C".into() });
        results.insert(0, PartialSummary { index: 0, text: "A".into() });
        results.insert(1, PartialSummary { index: 1, text: "B".into() });

        assert_eq!(combine_in_order(&results), "A\nB\nC");
    }

    #[test]
    fn combine_of_empty_result_set_is_empty() {
        assert_eq!(combine_in_order(&ResultSet::new()), "");
    }

    #[test]
    fn reduce_prompt_embeds_combined_context() {
        let prompt = build_reduce_prompt("A\nB\nC");
        assert!(prompt.contains("TEXT: A\nB\nC"));
        assert!(prompt.contains("introduction"));
        assert!(prompt.contains("bullet points"));
        assert!(prompt.contains("conclusion"));
    }
}
