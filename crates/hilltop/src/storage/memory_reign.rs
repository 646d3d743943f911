use std::collections::HashMap;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use parking_lot::Mutex;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::error::HillError;
use crate::reign::{Reign, ReignStore};

type WatchSender = tokio::sync::mpsc::UnboundedSender<Reign>;

/// In-memory reign store for testing and single-process deployments.
pub struct MemoryReignStore {
    inner: Mutex<Inner>,
}

struct Inner {
    current: Option<Reign>,
    /// Live watch channels keyed by watcher id.
    watchers: HashMap<u64, WatchSender>,
    next_watcher: u64,
}

impl MemoryReignStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: None,
                watchers: HashMap::new(),
                next_watcher: 0,
            }),
        }
    }
}

impl Default for MemoryReignStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReignStore for MemoryReignStore {
    async fn get_current(&self) -> Result<Option<Reign>, HillError> {
        Ok(self.inner.lock().current.clone())
    }

    async fn set_current(&self, reign: Reign) -> Result<Option<Reign>, HillError> {
        let mut inner = self.inner.lock();
        let previous = inner.current.replace(reign.clone());

        inner.watchers.retain(|id, tx| {
            if tx.send(reign.clone()).is_err() {
                tracing::debug!(watcher = id, "reign watcher gone, pruning");
                false
            } else {
                true
            }
        });

        Ok(previous)
    }

    async fn watch(&self) -> Result<Pin<Box<dyn Stream<Item = Reign> + Send>>, HillError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        let id = inner.next_watcher;
        inner.next_watcher += 1;
        inner.watchers.insert(id, tx);
        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }
}
