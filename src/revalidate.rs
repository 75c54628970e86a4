use std::sync::Arc;

use tokio::sync::broadcast;

/// Told which rendered page path went stale after a committed write.
pub trait Revalidate: Send + Sync {
    fn revalidate(&self, path: &str);
}

pub type DynRevalidate = Arc<dyn Revalidate>;

/// Fans revalidated paths out to every subscriber. Sending with no
/// subscribers is not an error; the signal is simply dropped.
#[derive(Clone)]
pub struct RevalidationBus {
    tx: broadcast::Sender<String>,
}

impl RevalidationBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for RevalidationBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Revalidate for RevalidationBus {
    fn revalidate(&self, path: &str) {
        let receivers = self.tx.send(path.to_string()).unwrap_or(0);
        tracing::debug!(path, receivers, "Revalidated path");
    }
}
