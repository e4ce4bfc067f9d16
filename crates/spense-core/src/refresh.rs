//! Refresh signal: an opaque change token shared across views
//!
//! Every successful mutation (create, delete, category update) bumps
//! the signal exactly once; failed mutations never do. Consumers hold
//! a listener and react to *change only* - the numeric value is an
//! implementation detail and must not be interpreted.

use tokio::sync::watch;

/// Monotonically increasing change token
///
/// Clones share the same underlying counter.
#[derive(Debug, Clone)]
pub struct RefreshSignal {
    tx: watch::Sender<u64>,
}

impl RefreshSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Record a successful mutation
    pub fn bump(&self) {
        self.tx.send_modify(|v| *v += 1);
    }

    /// Current token value; compare for change, never for magnitude
    pub fn value(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Create a listener that observes future bumps
    pub fn listen(&self) -> RefreshListener {
        let mut rx = self.tx.subscribe();
        // Mark the current value seen so only future bumps register
        rx.borrow_and_update();
        RefreshListener { rx }
    }
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer-side handle on a [`RefreshSignal`]
#[derive(Debug, Clone)]
pub struct RefreshListener {
    rx: watch::Receiver<u64>,
}

impl RefreshListener {
    /// True if the signal was bumped since the last check; clears the flag
    pub fn take_change(&mut self) -> bool {
        match self.rx.has_changed() {
            Ok(changed) => {
                if changed {
                    self.rx.borrow_and_update();
                }
                changed
            }
            // Sender dropped: no further changes will ever arrive
            Err(_) => false,
        }
    }

    /// Wait until the signal is bumped
    pub async fn changed(&mut self) {
        if self.rx.changed().await.is_ok() {
            self.rx.borrow_and_update();
        }
    }
}
