//! Scoped loading indicator.
//!
//! A [`LoadingGuard`] marks a fetch as in flight for as long as it lives.
//! Dropping it (normal return, `?`, panic unwind, task abort) clears the mark.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared in-flight counter. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one fetch as started. The mark is released when the guard drops.
    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// True while at least one guard is alive.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }
}

/// Releases its loading mark on drop.
#[must_use = "the loading flag clears as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_sets_and_clears() {
        let flag = LoadingFlag::new();
        assert!(!flag.is_loading());
        {
            let _guard = flag.begin();
            assert!(flag.is_loading());
        }
        assert!(!flag.is_loading());
    }

    #[test]
    fn overlapping_guards_keep_flag_set() {
        let flag = LoadingFlag::new();
        let first = flag.begin();
        let second = flag.clone().begin();
        drop(first);
        assert!(flag.is_loading());
        drop(second);
        assert!(!flag.is_loading());
    }

    #[test]
    fn cleared_on_early_return() {
        fn guarded(flag: &LoadingFlag, fail: bool) -> Result<(), &'static str> {
            let _guard = flag.begin();
            if fail {
                return Err("boom");
            }
            Ok(())
        }

        let flag = LoadingFlag::new();
        assert!(guarded(&flag, true).is_err());
        assert!(!flag.is_loading());
        assert!(guarded(&flag, false).is_ok());
        assert!(!flag.is_loading());
    }

    #[tokio::test]
    async fn cleared_when_task_is_aborted() {
        let flag = LoadingFlag::new();
        let task_flag = flag.clone();
        let handle = tokio::spawn(async move {
            let _guard = task_flag.begin();
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });

        tokio::task::yield_now().await;
        while !flag.is_loading() {
            tokio::task::yield_now().await;
        }
        handle.abort();
        let _ = handle.await;
        assert!(!flag.is_loading());
    }
}
