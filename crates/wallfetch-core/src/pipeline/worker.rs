//! Long-lived worker draining the item channel.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use super::Pipeline;
use crate::item::Item;

/// Producer side of the pipeline. Unbounded so extraction never waits on disk or network.
pub type ItemSender = mpsc::UnboundedSender<Item>;

impl Pipeline {
    /// Starts the worker. Each received item is handled on the blocking pool;
    /// items run concurrently and meet at the pipeline lock.
    ///
    /// The returned handle completes once every `ItemSender` clone is dropped
    /// and all in-flight items have finished.
    pub fn spawn(self: Arc<Self>) -> (ItemSender, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Item>();
        let handle = tokio::spawn(async move {
            let mut in_flight = JoinSet::new();
            loop {
                tokio::select! {
                    received = rx.recv() => match received {
                        Some(item) => {
                            let pipeline = Arc::clone(&self);
                            in_flight.spawn_blocking(move || {
                                pipeline.handle(&item);
                            });
                        }
                        None => break,
                    },
                    Some(res) = in_flight.join_next(), if !in_flight.is_empty() => {
                        if let Err(e) = res {
                            tracing::error!("pipeline item task: {}", e);
                        }
                    }
                }
            }
            while let Some(res) = in_flight.join_next().await {
                if let Err(e) = res {
                    tracing::error!("pipeline item task: {}", e);
                }
            }
            tracing::debug!("pipeline worker stopped");
        });
        (tx, handle)
    }
}
