#![forbid(unsafe_code)]

//! Virtual-time timer queue.
//!
//! The carousel never touches wall-clock timers directly. Every delayed
//! effect (autoplay ticks, transition unlock, clone correction) is a
//! [`TimerQueue`] entry, and the host drives time forward by feeding elapsed
//! durations. Tests substitute nothing: they just advance by exact amounts.
//!
//! # Invariants
//!
//! 1. Timers fire in deadline order; ties fire in scheduling order.
//! 2. While a timer is being handled, [`TimerQueue::now`] equals its
//!    deadline, so timers scheduled from a handler are anchored to the
//!    moment the previous one fired rather than to the end of the frame.
//! 3. A cancelled token never fires, and cancelling twice is harmless.
//! 4. Time never moves backwards.

use std::time::Duration;

use web_time::Instant;

/// Handle to a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
struct Entry<K> {
    token: TimerToken,
    deadline: Duration,
    kind: K,
}

/// A small deadline-ordered queue of cancellable timers.
///
/// `K` identifies what a timer is for; the owner matches on it when the
/// timer comes due.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<K>>,
}

impl<K: Copy> TimerQueue<K> {
    /// Create an empty queue at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::with_capacity(4),
        }
    }

    /// Current virtual time.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `kind` to fire `delay` after the current virtual time.
    pub fn schedule(&mut self, kind: K, delay: Duration) -> TimerToken {
        let token = TimerToken(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            token,
            deadline: self.now.saturating_add(delay),
            kind,
        });
        token
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        self.entries.len() != before
    }

    /// Whether `token` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    /// Deadline of a pending timer.
    #[must_use]
    pub fn deadline(&self, token: TimerToken) -> Option<Duration> {
        self.entries
            .iter()
            .find(|e| e.token == token)
            .map(|e| e.deadline)
    }

    /// Number of pending timers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no timers are pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// Moves [`now`](Self::now) to that timer's deadline. Returns `None`
    /// once nothing else is due; call [`settle`](Self::settle) afterwards to
    /// move the clock the rest of the way.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerToken, K)> {
        let (pos, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= until)
            .min_by_key(|(_, e)| (e.deadline, e.token.0))?;
        let entry = self.entries.remove(pos);
        self.now = self.now.max(entry.deadline);
        Some((entry.token, entry.kind))
    }

    /// Move the clock to `until` without firing anything.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl<K: Copy> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest wall-clock gap a single frame may account for.
///
/// Anything longer is treated as a suspension (backgrounded tab, sleeping
/// host) and clamped, so missed autoplay ticks are skipped rather than
/// replayed in one frame.
pub const MAX_FRAME_GAP: Duration = Duration::from_millis(250);

/// Converts wall-clock samples into frame deltas.
///
/// The first sample yields a zero delta. Samples that go backwards also
/// yield zero. Gaps longer than the configured maximum are clamped to it.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_gap: Duration,
}

impl FrameClock {
    /// Create a clock with no samples yet, clamping gaps to [`MAX_FRAME_GAP`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_gap(MAX_FRAME_GAP)
    }

    /// Create a clock that clamps gaps to `max_gap`.
    #[must_use]
    pub fn with_max_gap(max_gap: Duration) -> Self {
        Self {
            last: None,
            max_gap,
        }
    }

    /// Record `now` and return the time since the previous sample.
    pub fn delta(&mut self, now: Instant) -> Duration {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        if dt > self.max_gap {
            tracing::trace!(gap = ?dt, clamped_to = ?self.max_gap, "frame gap clamped");
            return self.max_gap;
        }
        dt
    }

    /// Forget the last sample, e.g. after the host was suspended.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_200: Duration = Duration::from_millis(200);

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        A,
        B,
        C,
    }

    fn drain(q: &mut TimerQueue<Kind>, until: Duration) -> Vec<Kind> {
        let mut out = Vec::new();
        while let Some((_, kind)) = q.pop_due(until) {
            out.push(kind);
        }
        q.settle(until);
        out
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(Kind::B, MS_200);
        q.schedule(Kind::A, MS_100);
        assert_eq!(drain(&mut q, MS_200), vec![Kind::A, Kind::B]);
        assert!(q.is_empty());
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule(Kind::C, MS_100);
        q.schedule(Kind::A, MS_100);
        q.schedule(Kind::B, MS_100);
        assert_eq!(drain(&mut q, MS_100), vec![Kind::C, Kind::A, Kind::B]);
    }

    #[test]
    fn not_due_timers_stay_pending() {
        let mut q = TimerQueue::new();
        let t = q.schedule(Kind::A, MS_200);
        assert!(drain(&mut q, MS_100).is_empty());
        assert!(q.is_pending(t));
        assert_eq!(q.now(), MS_100);
        assert_eq!(q.deadline(t), Some(MS_200));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let t = q.schedule(Kind::A, MS_100);
        assert!(q.cancel(t));
        assert!(!q.cancel(t));
        assert!(drain(&mut q, MS_200).is_empty());
    }

    #[test]
    fn now_tracks_fired_deadline() {
        let mut q = TimerQueue::new();
        q.schedule(Kind::A, MS_100);
        let (_, kind) = q.pop_due(Duration::from_secs(1)).unwrap();
        assert_eq!(kind, Kind::A);
        assert_eq!(q.now(), MS_100);

        // A follow-up scheduled from the handler is anchored at 100ms.
        let t = q.schedule(Kind::B, MS_100);
        assert_eq!(q.deadline(t), Some(MS_200));
    }

    #[test]
    fn time_never_goes_backwards() {
        let mut q: TimerQueue<Kind> = TimerQueue::new();
        q.settle(MS_200);
        q.settle(MS_100);
        assert_eq!(q.now(), MS_200);
    }

    #[test]
    fn clear_drops_everything() {
        let mut q = TimerQueue::new();
        q.schedule(Kind::A, MS_100);
        q.schedule(Kind::B, MS_200);
        assert_eq!(q.len(), 2);
        q.clear();
        assert!(q.is_empty());
        assert!(drain(&mut q, MS_200).is_empty());
    }

    #[test]
    fn frame_clock_first_sample_is_zero() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        assert_eq!(clock.delta(t0), Duration::ZERO);
        assert_eq!(clock.delta(t0 + MS_100), MS_100);
        clock.reset();
        assert_eq!(clock.delta(t0 + MS_200), Duration::ZERO);
    }

    #[test]
    fn frame_clock_clamps_long_gaps() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.delta(t0);
        assert_eq!(clock.delta(t0 + Duration::from_secs(3600)), MAX_FRAME_GAP);
        // The next frame measures from the late sample, not from t0.
        let t1 = t0 + Duration::from_secs(3600);
        assert_eq!(clock.delta(t1 + MS_100), MS_100);

        let mut wide = FrameClock::with_max_gap(Duration::from_secs(10));
        wide.delta(t0);
        assert_eq!(wide.delta(t0 + Duration::from_secs(5)), Duration::from_secs(5));
    }
}
