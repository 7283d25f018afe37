use std::future::Future;

use tokio::task::JoinHandle;

/// Owned async task.  Dropping the handle aborts the task, which is
/// how peer reader/writer/connect tasks are torn down on state
/// transitions.
#[derive(Debug)]
pub struct Task<T> {
    join: JoinHandle<T>,
}

impl<T> Task<T>
where
    T: Send + 'static,
{
    pub fn spawn<F>(fut: F) -> Task<T>
    where
        F: Future<Output = T> + Send + 'static,
    {
        Task {
            join: tokio::spawn(fut),
        }
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        self.join.abort();
    }
}
