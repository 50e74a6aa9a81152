use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Runs `future`, turning a panic into `Err(message)`.
///
/// Background tasks report their outcome as an event; a task that panics
/// must still report something or the store would wait on it forever.
pub async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "task panicked with a non-string payload".to_string()
            }
        })
}
