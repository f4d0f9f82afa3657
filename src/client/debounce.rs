//! Input debouncing for filter-driven navigation.
//!
//! Every input restarts the delay window; when the window closes without new
//! input, the latest value is handed to the action. Actions run on their own
//! task so a slow navigation never delays the next window.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default delay for search-as-you-type.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, mut action: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                let mut closed = false;
                loop {
                    match tokio::time::timeout(delay, rx.recv()).await {
                        Ok(Some(next)) => latest = next,
                        Ok(None) => {
                            closed = true;
                            break;
                        }
                        Err(_) => break,
                    }
                }

                tokio::spawn(action(latest));
                if closed {
                    break;
                }
            }
        });

        Self { tx, task }
    }

    /// Feed one input event.
    pub fn input(&self, value: T) {
        if self.tx.send(value).is_err() {
            tracing::warn!("Debouncer input after close");
        }
    }

    /// Flush the pending input, if any, and stop.
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}
