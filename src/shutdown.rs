//! Cooperative shutdown on SIGINT/SIGTERM.

use crate::error::Result;
use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Flag set by the signal handlers and polled once per frame
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
}

impl ShutdownFlag {
    /// Create a flag with no handlers attached
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flag that SIGINT and SIGTERM will set
    ///
    /// # Errors
    ///
    /// Returns an error if the signal handlers cannot be registered
    pub fn install() -> Result<Self> {
        let flag = Self::new();
        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&flag.requested))?;
        }
        Ok(flag)
    }

    /// Ask the loop to stop
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Whether shutdown was requested
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_shared_between_clones() {
        let flag = ShutdownFlag::new();
        let other = flag.clone();
        assert!(!flag.is_requested());
        other.request();
        assert!(flag.is_requested());
    }
}
