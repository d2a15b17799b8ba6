// ABOUTME: Cooperative cancellation signal for an in-flight prune run.
// ABOUTME: Backed by a tokio watch channel so every stage observes the same trip.

use tokio::sync::watch;

/// Trips a [`Cancellation`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        // Receivers may already be gone once the run finished.
        let _ = self.tx.send(true);
    }
}

/// Observed by the pipeline between and during registry calls.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: Option<watch::Receiver<bool>>,
}

impl Cancellation {
    /// Create a linked handle and cancellation.
    pub fn pair() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, Self { rx: Some(rx) })
    }

    /// A cancellation that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once cancelled. Pends forever for [`Cancellation::never`] or
    /// when the handle is dropped without cancelling.
    pub async fn cancelled(&self) {
        let Some(rx) = self.rx.as_ref() else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::never()
    }
}
