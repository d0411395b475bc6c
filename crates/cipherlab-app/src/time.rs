//! Time abstraction and deadline bookkeeping.
//!
//! Views never read a clock. Every entry point takes `now` and deadlines are
//! plain data compared against it, so tests drive time by hand and the
//! runtime can use real or paused tokio time.

use std::{collections::BTreeMap, fmt::Debug, ops::Add, ops::Sub, time::Duration};

/// Monotonic instant.
///
/// Implemented by `tokio::time::Instant` in production and by [`Duration`]
/// (time since an arbitrary origin) in tests.
pub trait Moment:
    Copy + Ord + Send + Sync + Debug + 'static + Add<Duration, Output = Self> + Sub<Output = Duration>
{
    /// `self - earlier`, or zero if `earlier` is in the future.
    fn since(self, earlier: Self) -> Duration {
        if self >= earlier { self - earlier } else { Duration::ZERO }
    }
}

impl<T> Moment for T where
    T: Copy
        + Ord
        + Send
        + Sync
        + Debug
        + 'static
        + Add<Duration, Output = T>
        + Sub<Output = Duration>
{
}

/// Named deadlines.
///
/// At most one deadline per key; scheduling again replaces it.
#[derive(Debug, Clone)]
pub struct Timers<K, I> {
    deadlines: BTreeMap<K, I>,
}

impl<K: Ord + Copy, I: Moment> Timers<K, I> {
    /// No deadlines.
    pub fn new() -> Self {
        Self { deadlines: BTreeMap::new() }
    }

    /// Set `key` to fire at `at`, replacing any earlier deadline for it.
    pub fn schedule(&mut self, key: K, at: I) {
        self.deadlines.insert(key, at);
    }

    /// Deadline for `key`, if pending.
    pub fn deadline(&self, key: K) -> Option<I> {
        self.deadlines.get(&key).copied()
    }

    /// Remove and return every key whose deadline is `<= now`, earliest
    /// first.
    pub fn expire(&mut self, now: I) -> Vec<K> {
        let mut due: Vec<(I, K)> =
            self.deadlines.iter().filter(|(_, at)| **at <= now).map(|(k, at)| (*at, *k)).collect();
        due.sort();
        for (_, key) in &due {
            self.deadlines.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    /// No deadline pending.
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

impl<K: Ord + Copy, I: Moment> Default for Timers<K, I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_at_deadline_not_before() {
        let mut timers = Timers::new();
        timers.schedule('a', ms(100));

        assert!(timers.expire(ms(99)).is_empty());
        assert_eq!(timers.expire(ms(100)), vec!['a']);
        assert!(timers.expire(ms(200)).is_empty());
    }

    #[test]
    fn reschedule_replaces() {
        let mut timers = Timers::new();
        timers.schedule(1, ms(100));
        timers.schedule(1, ms(300));

        assert!(timers.expire(ms(200)).is_empty());
        assert_eq!(timers.deadline(1), Some(ms(300)));
    }

    #[test]
    fn expire_orders_by_deadline() {
        let mut timers = Timers::new();
        timers.schedule(1, ms(30));
        timers.schedule(2, ms(10));
        timers.schedule(3, ms(20));

        assert_eq!(timers.expire(ms(50)), vec![2, 3, 1]);
        assert!(timers.is_empty());
    }

    #[test]
    fn since_saturates() {
        assert_eq!(ms(5).since(ms(10)), Duration::ZERO);
        assert_eq!(ms(10).since(ms(4)), ms(6));
    }
}
