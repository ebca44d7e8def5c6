//! Shutdown coordination for the proxy.
//!
//! A single `watch` flag flips from running to stopping. It is level-triggered:
//! a task that subscribes after the trigger still sees it, and triggering
//! twice is harmless.

use std::sync::Arc;
use tokio::sync::watch;

/// Handle that starts a graceful shutdown. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// A signal that resolves once shutdown has been triggered.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every subscriber to stop.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end of [`Shutdown`], held by the server.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait for the trigger. Also resolves if every `Shutdown` handle is
    /// dropped, since nothing could trigger it afterwards.
    pub async fn recv(&mut self) {
        let _ = self.rx.wait_for(|stopping| *stopping).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.clone().subscribe();
        assert!(!shutdown.is_triggered());

        shutdown.trigger();
        assert!(shutdown.is_triggered());
        tokio::time::timeout(Duration::from_secs(1), a.recv()).await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), b.recv()).await.unwrap();
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();

        let mut late = shutdown.subscribe();
        tokio::time::timeout(Duration::from_secs(1), late.recv()).await.unwrap();
    }

    #[tokio::test]
    async fn test_signal_waits_until_triggered() {
        let shutdown = Shutdown::new();
        let mut signal = shutdown.subscribe();

        let pending = tokio::time::timeout(Duration::from_millis(50), signal.recv()).await;
        assert!(pending.is_err());

        let handle = shutdown.clone();
        tokio::spawn(async move { handle.trigger() });
        tokio::time::timeout(Duration::from_secs(1), signal.recv()).await.unwrap();
    }
}
