//! Staleness-gated caching of remote values
//!
//! A [`TimedValue`] pairs the last successfully fetched value with the
//! instant it was fetched. Staleness is always measured from the last
//! success, so a failed attempt never pushes the next refresh further out.
//! Failures are remembered separately and only used to throttle retries.

use embassy_time::{Duration, Instant};

/// Outcome of a successful [`TimedValue::refresh_if_stale`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The cached value was young enough; nothing was fetched.
    Fresh,
    /// A fetch ran and replaced the cached value.
    Fetched,
}

/// The last successfully fetched value of a source, with the instants of its
/// last success and last failure.
///
/// A failed fetch keeps the previous value on screen; only the failure time
/// is recorded so [`TimedValue::retry_due`] can hold off retries for the cooldown.
#[derive(Debug, Clone)]
pub struct TimedValue<T> {
    value: Option<T>,
    fetched_at: Option<Instant>,
    failed_at: Option<Instant>,
}

impl<T> TimedValue<T> {
    /// A value that has never been fetched.
    pub const fn empty() -> Self {
        Self {
            value: None,
            fetched_at: None,
            failed_at: None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Instant of the last successful fetch.
    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    /// Instant of the last failed attempt since the last success.
    pub fn failed_at(&self) -> Option<Instant> {
        self.failed_at
    }

    /// True when nothing was fetched yet or the last success is at least
    /// `interval` old.
    pub fn is_stale(&self, now: Instant, interval: Duration) -> bool {
        match self.fetched_at {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= interval,
        }
    }

    /// True unless a failure happened less than `cooldown` ago.
    pub fn retry_due(&self, now: Instant, cooldown: Duration) -> bool {
        match self.failed_at {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= cooldown,
        }
    }

    /// Replace the cached value wholesale.
    pub fn store(&mut self, value: T, now: Instant) {
        self.value = Some(value);
        self.fetched_at = Some(now);
        self.failed_at = None;
    }

    /// Run `fetch` if the value is stale.
    ///
    /// On success the value and its timestamp are replaced with the result
    /// and `now`. On failure the error is returned and the cached value and
    /// its timestamp are left untouched.
    pub async fn refresh_if_stale<F, Fut, E>(
        &mut self,
        now: Instant,
        interval: Duration,
        fetch: F,
    ) -> Result<Refresh, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.is_stale(now, interval) {
            return Ok(Refresh::Fresh);
        }

        match fetch().await {
            Ok(value) => {
                self.store(value, now);
                Ok(Refresh::Fetched)
            }
            Err(e) => {
                self.failed_at = Some(now);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embassy_futures::block_on;

    const HOUR: Duration = Duration::from_secs(3600);

    fn at(secs: u64) -> Instant {
        Instant::from_secs(secs)
    }

    /// Refresh with a fetcher that counts its calls and yields `result`.
    fn refresh(
        cache: &mut TimedValue<u32>,
        now: Instant,
        calls: &Cell<u32>,
        result: Result<u32, &'static str>,
    ) -> Result<Refresh, &'static str> {
        block_on(cache.refresh_if_stale(now, HOUR, || {
            calls.set(calls.get() + 1);
            async move { result }
        }))
    }

    #[test]
    fn test_first_refresh_always_fetches() {
        let mut cache = TimedValue::empty();
        let calls = Cell::new(0);

        assert_eq!(refresh(&mut cache, at(10), &calls, Ok(7)), Ok(Refresh::Fetched));
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.value(), Some(&7));
        assert_eq!(cache.fetched_at(), Some(at(10)));
    }

    #[test]
    fn test_refetch_after_interval() {
        let mut cache = TimedValue::empty();
        cache.store(1, at(10_000));
        let calls = Cell::new(0);

        let now = at(10_000 + 3601);
        assert_eq!(refresh(&mut cache, now, &calls, Ok(2)), Ok(Refresh::Fetched));
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.value(), Some(&2));
        assert_eq!(cache.fetched_at(), Some(now));
    }

    #[test]
    fn test_refetch_exactly_at_interval() {
        let mut cache = TimedValue::empty();
        cache.store(1, at(10_000));
        let calls = Cell::new(0);

        refresh(&mut cache, at(10_000 + 3600), &calls, Ok(2)).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_young_value_is_returned_unchanged() {
        let mut cache = TimedValue::empty();
        cache.store(1, at(10_000));
        let calls = Cell::new(0);

        assert_eq!(
            refresh(&mut cache, at(10_000 + 3599), &calls, Ok(2)),
            Ok(Refresh::Fresh)
        );
        assert_eq!(calls.get(), 0);
        assert_eq!(cache.value(), Some(&1));
        assert_eq!(cache.fetched_at(), Some(at(10_000)));
    }

    #[test]
    fn test_failure_keeps_value_and_timestamp() {
        let mut cache = TimedValue::empty();
        cache.store(1, at(10_000));
        let calls = Cell::new(0);
        let now = at(10_000 + 4000);

        assert_eq!(refresh(&mut cache, now, &calls, Err("offline")), Err("offline"));
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.value(), Some(&1));
        assert_eq!(cache.fetched_at(), Some(at(10_000)));
        assert_eq!(cache.failed_at(), Some(now));
        // Still stale: the failed attempt did not restart the interval.
        assert!(cache.is_stale(now, HOUR));
    }

    #[test]
    fn test_retry_cooldown_tracks_last_failure() {
        let mut cache = TimedValue::<u32>::empty();
        let calls = Cell::new(0);
        let cooldown = Duration::from_secs(60);

        assert!(cache.retry_due(at(100), cooldown));
        refresh(&mut cache, at(100), &calls, Err("offline")).unwrap_err();

        assert!(!cache.retry_due(at(159), cooldown));
        assert!(cache.retry_due(at(160), cooldown));

        refresh(&mut cache, at(160), &calls, Ok(3)).unwrap();
        assert_eq!(cache.failed_at(), None);
        assert!(cache.retry_due(at(161), cooldown));
    }

    #[test]
    fn test_clock_going_backwards_is_not_stale() {
        let mut cache = TimedValue::empty();
        cache.store(1, at(10_000));
        assert!(!cache.is_stale(at(9_000), HOUR));
    }
}
