//! In-memory flag tracking recent peer work-generation failures.
//!
//! Mirrors the `work_failure` Redis key from the original implementation,
//! but process-local: cross-process correctness is not required (SPEC_FULL
//! §5), so a `tokio::sync::Mutex<Option<Instant>>` with a manual TTL check
//! stands in for a shared key/value store.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

const TTL: Duration = Duration::from_secs(300);

/// Tracks whether peer work generation has failed recently.
///
/// While set, [`WorkClient::generate`](crate::work::WorkClient::generate)
/// eagerly races a local generator alongside peer requests instead of
/// only falling back to one after every peer has failed.
#[derive(Debug, Default)]
pub struct WorkFailureFlag {
    set_at: Mutex<Option<Instant>>,
}

impl WorkFailureFlag {
    /// Create a new, unset flag.
    pub fn new() -> Self {
        WorkFailureFlag {
            set_at: Mutex::new(None),
        }
    }

    /// Mark peer work generation as having failed, starting a fresh TTL.
    pub async fn set(&self) {
        let mut guard = self.set_at.lock().await;
        *guard = Some(Instant::now());
    }

    /// Whether the flag is currently set (i.e. set within the last TTL).
    pub async fn is_set(&self) -> bool {
        let mut guard = self.set_at.lock().await;
        match *guard {
            Some(at) if at.elapsed() < TTL => true,
            Some(_) => {
                *guard = None;
                false
            }
            None => false,
        }
    }
}
