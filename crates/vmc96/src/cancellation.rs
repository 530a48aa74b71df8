//! Cooperative cancellation for the response polling loop.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Shared flag that aborts a command while it waits for the board.
///
/// Clones share the flag, so one clone can be handed to another thread (a
/// shutdown handler, a watchdog) while the device keeps the other.  Once
/// set, every later poll fails with [`Vmc96Error::Cancelled`] until
/// [`reset`](Self::reset) is called.
///
/// [`Vmc96Error::Cancelled`]: crate::Vmc96Error::Cancelled
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clears the flag so the device can be used again.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
