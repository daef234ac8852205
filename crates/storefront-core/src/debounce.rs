//! Keyed "latest wins" debounce timers on a host-supplied clock.
//!
//! Each key owns at most one pending timer. Arming a key that already has a
//! pending timer replaces it, the same way `clearTimeout` followed by
//! `setTimeout` does. Timestamps are monotonic [`Duration`]s from the host
//! (`performance.now()` in the browser), so behavior is fully deterministic
//! under test.
//!
//! ```
//! use std::time::Duration;
//! use storefront_core::debounce::Debouncer;
//!
//! let ms = Duration::from_millis;
//! let mut d = Debouncer::new();
//! d.arm_at("desktop", "l", ms(0), ms(300));
//! d.arm_at("desktop", "la", ms(100), ms(300));
//! d.arm_at("desktop", "lap", ms(200), ms(300));
//! assert!(d.fire_due(ms(499)).is_empty());
//! assert_eq!(d.fire_due(ms(500)), vec![("desktop", "lap")]);
//! ```

use std::time::Duration;

#[derive(Debug)]
struct Pending<K, T> {
    key: K,
    payload: T,
    deadline: Duration,
    seq: u64,
}

/// Keyed single-slot timers.
#[derive(Debug)]
pub struct Debouncer<K, T> {
    pending: Vec<Pending<K, T>>,
    seq: u64,
}

impl<K: PartialEq, T> Default for Debouncer<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, T> Debouncer<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            seq: 0,
        }
    }

    /// Arm `key` to fire `delay` after `now`. Returns the payload it replaced.
    pub fn arm_at(&mut self, key: K, payload: T, now: Duration, delay: Duration) -> Option<T> {
        self.arm_until(key, payload, now.saturating_add(delay))
    }

    /// Arm `key` to fire at the absolute `deadline`. Returns the payload it
    /// replaced.
    pub fn arm_until(&mut self, key: K, payload: T, deadline: Duration) -> Option<T> {
        let replaced = self.cancel(&key);
        self.seq += 1;
        self.pending.push(Pending {
            key,
            payload,
            deadline,
            seq: self.seq,
        });
        replaced
    }

    /// Drop the pending timer for `key`, returning its payload.
    pub fn cancel(&mut self, key: &K) -> Option<T> {
        let idx = self.pending.iter().position(|p| &p.key == key)?;
        Some(self.pending.swap_remove(idx).payload)
    }

    /// Remove and return every timer whose deadline is at or before `now`,
    /// ordered by deadline, then by arming order.
    pub fn fire_due(&mut self, now: Duration) -> Vec<(K, T)> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].deadline <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|p| (p.deadline, p.seq));
        due.into_iter().map(|p| (p.key, p.payload)).collect()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Time left until the earliest timer fires (zero if already due).
    #[must_use]
    pub fn time_until_next(&self, now: Duration) -> Option<Duration> {
        self.next_deadline().map(|d| d.saturating_sub(now))
    }

    /// Whether `key` has a pending timer.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.iter().any(|p| &p.key == key)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timer is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
