//! Subscriber registry
//!
//! Tracks live subscriber connections as bounded frame channels. The
//! transport layer registers on accept and unregisters on close; broadcast
//! iteration snapshots the sender list so concurrent add/remove is safe.

use std::collections::HashMap;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

/// Registry of open subscriber connections
pub struct SubscriberRegistry {
    buffer: usize,
    inner: Mutex<HashMap<Uuid, mpsc::Sender<String>>>,
}

impl SubscriberRegistry {
    /// Create a registry with the given per-subscriber frame buffer
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Register a new subscriber, returning its id and frame receiver
    pub async fn register(&self) -> (Uuid, mpsc::Receiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.buffer);
        self.inner.lock().await.insert(id, tx);
        tracing::debug!(subscriber = %id, "Subscriber registered");
        (id, rx)
    }

    /// Remove a subscriber
    pub async fn unregister(&self, id: &Uuid) {
        if self.inner.lock().await.remove(id).is_some() {
            tracing::debug!(subscriber = %id, "Subscriber unregistered");
        }
    }

    /// Snapshot the current senders for iteration
    pub async fn senders(&self) -> Vec<(Uuid, mpsc::Sender<String>)> {
        self.inner
            .lock()
            .await
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect()
    }

    /// Current subscriber count
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Whether no subscribers are connected
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_unregister() {
        let registry = SubscriberRegistry::new(4);
        assert!(registry.is_empty().await);

        let (id, _rx) = registry.register().await;
        assert_eq!(registry.len().await, 1);

        registry.unregister(&id).await;
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_unregister_unknown_id_is_noop() {
        let registry = SubscriberRegistry::new(4);
        registry.unregister(&Uuid::new_v4()).await;
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_senders_snapshot_is_independent() {
        let registry = SubscriberRegistry::new(4);
        let (id_a, mut rx_a) = registry.register().await;
        let (_id_b, _rx_b) = registry.register().await;

        let senders = registry.senders().await;
        assert_eq!(senders.len(), 2);

        // Removing during iteration of the snapshot must not panic or block
        registry.unregister(&id_a).await;
        for (_, tx) in senders {
            let _ = tx.try_send("frame".to_string());
        }
        assert!(rx_a.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_registration() {
        let registry = std::sync::Arc::new(SubscriberRegistry::new(4));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move { registry.register().await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, 16);
    }
}
