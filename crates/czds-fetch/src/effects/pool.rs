use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error};

/// A fixed set of workers draining one bounded queue.
///
/// Each queued value is handled by exactly one worker. Workers exit once every
/// sender returned by [`WorkerPool::spawn`] is dropped and the queue is empty.
pub struct WorkerPool {
    name: &'static str,
    workers: JoinSet<()>,
}

impl WorkerPool {
    /// Start `workers` tasks (at least one) behind a queue of `capacity` slots.
    pub fn spawn<T, H, Fut>(
        name: &'static str,
        workers: usize,
        capacity: usize,
        handler: H,
    ) -> (mpsc::Sender<T>, Self)
    where
        T: Send + 'static,
        H: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));
        let handler = Arc::new(handler);
        let mut set = JoinSet::new();

        for id in 0..workers.max(1) {
            let rx = Arc::clone(&rx);
            let handler = Arc::clone(&handler);
            set.spawn(async move {
                loop {
                    let next = rx.lock().await.recv().await;
                    match next {
                        Some(value) => handler(value).await,
                        None => break,
                    }
                }
                debug!(pool = name, worker = id, "worker finished");
            });
        }

        (tx, Self { name, workers: set })
    }

    /// Wait for every worker to exit.
    pub async fn join(mut self) {
        while let Some(result) = self.workers.join_next().await {
            if let Err(e) = result {
                error!(pool = self.name, "worker task failed: {e}");
            }
        }
    }
}
