//! Parallel fan-out of chunk summarization tasks with a full join barrier.

use std::future::Future;

use tokio::task::JoinSet;

use super::types::{PartialSummary, PipelineError, ResultSet};

/// Run one concurrent task per chunk summarization future and join them all.
///
/// Every task runs to completion before this function returns: a failing
/// task does not cancel its siblings, but once the barrier is passed the
/// first observed error fails the whole dispatch and any completed partial
/// summaries are discarded. Completion order is unspecified; the result set
/// is keyed by chunk index so the reducer can restore document order.
pub(crate) async fn dispatch<Fut>(tasks: Vec<Fut>) -> Result<ResultSet, PipelineError>
where
    Fut: Future<Output = Result<PartialSummary, PipelineError>> + Send + 'static,
{
    let mut join_set = JoinSet::new();
    for task in tasks {
        join_set.spawn(task);
    }

    let mut results = ResultSet::new();
    let mut first_error: Option<PipelineError> = None;
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Ok(partial)) => {
                results.insert(partial.index, partial);
            }
            Ok(Err(error)) => {
                tracing::warn!(error = %error, "Chunk summarization failed");
                first_error.get_or_insert(error);
            }
            Err(join_error) => {
                tracing::error!(error = %join_error, "Chunk task did not complete");
                first_error.get_or_insert(PipelineError::Task(join_error));
            }
        }
    }

    match first_error {
        Some(error) => Err(error),
        None => Ok(results),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionError;
    use std::pin::Pin;
    use std::time::Duration;

    type BoxedTask = Pin<Box<dyn Future<Output = Result<PartialSummary, PipelineError>> + Send>>;

    fn partial(index: usize, text: &str) -> PartialSummary {
        PartialSummary {
            index,
            text: text.to_string(),
        }
    }

    fn delayed(index: usize, text: &'static str, delay_ms: u64) -> BoxedTask {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(partial(index, text))
        })
    }

    #[tokio::test]
    async fn collects_results_keyed_by_index_regardless_of_completion_order() {
        // Chunk 2 finishes first, then 0, then 1.
        let tasks = vec![delayed(0, "A", 20), delayed(1, "B", 40), delayed(2, "C", 0)];

        let results = dispatch(tasks).await.expect("dispatch succeeded");
        let ordered: Vec<&str> = results.values().map(|p| p.text.as_str()).collect();
        assert_eq!(ordered, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn single_failure_fails_the_whole_dispatch() {
        let failing: BoxedTask = Box::pin(async {
            Err(PipelineError::Completion(
                CompletionError::GenerationFailed("quota exceeded".into()),
            ))
        });
        let tasks = vec![delayed(0, "A", 0), failing, delayed(2, "C", 0)];

        let error = dispatch(tasks).await.expect_err("dispatch failed");
        assert!(matches!(error, PipelineError::Completion(_)));
    }

    #[tokio::test]
    async fn sibling_tasks_run_to_completion_despite_a_failure() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let completed = Arc::new(AtomicUsize::new(0));
        let slow: BoxedTask = {
            let completed = Arc::clone(&completed);
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                Ok(partial(1, "B"))
            })
        };
        let failing: BoxedTask = Box::pin(async {
            Err(PipelineError::Completion(
                CompletionError::ProviderUnavailable("connection refused".into()),
            ))
        });

        assert!(dispatch(vec![failing, slow]).await.is_err());
        // The barrier waited for the slow sibling even though the failure
        // was observed first.
        assert_eq!(completed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_task_list_yields_empty_result_set() {
        let results = dispatch(Vec::<BoxedTask>::new())
            .await
            .expect("dispatch succeeded");
        assert!(results.is_empty());
    }
}
