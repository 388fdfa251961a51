use std::future::Future;

use tokio::task::JoinHandle;

/// A background request owned by a portal component; dropping it aborts the
/// request so a torn-down component never receives a late result.
#[derive(Debug)]
pub struct PendingFetch<T> {
    handle: JoinHandle<T>,
}

impl<T> PendingFetch<T>
where
    T: Send + 'static,
{
    /// Must be called inside a tokio runtime.
    pub fn spawn<F>(request: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(request),
        }
    }

    /// Waits for the result; `None` if the request was aborted or panicked.
    pub async fn join(mut self) -> Option<T> {
        (&mut self.handle).await.ok()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl<T> Drop for PendingFetch<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
