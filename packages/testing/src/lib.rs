#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing and examples in `poly_box`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts how many tracked values have been created and how many have been dropped.
///
/// Embed a [`LifecycleToken`] obtained from [`token()`][Self::token] in a test type. Every
/// clone of the token counts as a new value and every drop of a token counts as a destroyed
/// value, so the tracker observes exactly how often the enclosing type was cloned and dropped.
///
/// # Example
///
/// ```rust
/// use testing::LifecycleTracker;
///
/// let tracker = LifecycleTracker::new();
///
/// let token = tracker.token();
/// let copy = token.clone();
/// drop(token);
///
/// assert_eq!(tracker.created(), 2);
/// assert_eq!(tracker.dropped(), 1);
/// assert_eq!(tracker.live(), 1);
/// # drop(copy);
/// ```
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    created: AtomicUsize,
    dropped: AtomicUsize,
}

impl LifecycleTracker {
    /// Creates a tracker that has not observed any values yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new tracked value, counting it as created.
    #[must_use]
    pub fn token(&self) -> LifecycleToken {
        LifecycleToken::new(Arc::clone(&self.counters))
    }

    /// How many tracked values have been created, including clones.
    #[must_use]
    pub fn created(&self) -> usize {
        self.counters.created.load(Ordering::Relaxed)
    }

    /// How many tracked values have been dropped.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.counters.dropped.load(Ordering::Relaxed)
    }

    /// How many tracked values are currently alive.
    #[must_use]
    pub fn live(&self) -> usize {
        self.created().saturating_sub(self.dropped())
    }
}

/// A value whose creation, cloning and dropping is counted by a [`LifecycleTracker`].
#[derive(Debug)]
pub struct LifecycleToken {
    counters: Arc<Counters>,
}

impl LifecycleToken {
    fn new(counters: Arc<Counters>) -> Self {
        counters.created.fetch_add(1, Ordering::Relaxed);

        Self { counters }
    }
}

impl Clone for LifecycleToken {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.counters))
    }
}

impl Drop for LifecycleToken {
    fn drop(&mut self) {
        self.counters.dropped.fetch_add(1, Ordering::Relaxed);
    }
}
