use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Orders responses of requests that may resolve out of issue order.
///
/// Every request takes a ticket when issued. A response is admitted only if
/// no request issued after it has already been admitted.
#[derive(Debug, Default)]
pub struct SequenceGuard {
    issued: AtomicU64,
    applied: Mutex<u64>,
}

impl SequenceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a request being issued now; starts at 1
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Ticket of the most recently issued request (0 before any)
    pub fn latest_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Claims the right to apply the response of `sequence`
    pub fn admit(&self, sequence: u64) -> bool {
        let mut applied = self
            .applied
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if sequence < *applied {
            return false;
        }
        *applied = sequence;
        true
    }

    /// Highest ticket admitted so far (0 before any)
    pub fn last_applied(&self) -> u64 {
        *self
            .applied
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_order_responses_all_admitted() {
        let guard = SequenceGuard::new();
        let first = guard.issue();
        let second = guard.issue();
        assert!(guard.admit(first));
        assert!(guard.admit(second));
        assert_eq!(guard.last_applied(), 2);
    }

    #[test]
    fn test_late_older_response_rejected() {
        let guard = SequenceGuard::new();
        let first = guard.issue();
        let second = guard.issue();
        assert!(guard.admit(second));
        assert!(!guard.admit(first));
        assert_eq!(guard.last_applied(), second);
    }
}
