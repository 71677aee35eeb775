#![forbid(unsafe_code)]

//! Autoplay scheduling.
//!
//! [`AutoplayScheduler`] keeps at most one autoplay timer armed in a
//! [`TimerQueue`]. It does not advance anything itself: when its timer comes
//! due the owner asks [`on_timer`](AutoplayScheduler::on_timer) whether to
//! advance, performs the advance through its normal navigation path, and
//! then calls [`rearm`](AutoplayScheduler::rearm). The advance therefore
//! always runs against the owner's current state and the latest speed.
//!
//! # Invariants
//!
//! 1. At most one autoplay timer is pending.
//! 2. `play()` while playing cancels and reschedules; it never double-arms.
//! 3. `set_speed()` never touches the pending timer; the new interval is
//!    used from the next arm onwards.
//! 4. After `pause()`, neither a stale timer nor `rearm()` schedules again.
//! 5. A zero interval disables scheduling instead of spinning.

use std::time::Duration;

use crate::timer::{TimerQueue, TimerToken};

/// Recurring advance timer with play/pause control.
#[derive(Debug, Clone)]
pub struct AutoplayScheduler<K> {
    kind: K,
    interval: Duration,
    playing: bool,
    pending: Option<TimerToken>,
}

impl<K: Copy> AutoplayScheduler<K> {
    /// Create a paused scheduler whose timers are tagged `kind`.
    #[must_use]
    pub fn new(kind: K, interval: Duration) -> Self {
        Self {
            kind,
            interval,
            playing: false,
            pending: None,
        }
    }

    /// Whether autoplay is running.
    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Interval between advances.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Token of the armed timer, if any.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> Option<TimerToken> {
        self.pending
    }

    /// Start (or restart) playback with the current interval.
    pub fn play(&mut self, timers: &mut TimerQueue<K>) {
        self.disarm(timers);
        self.playing = true;
        self.arm(timers);
    }

    /// Stop playback and cancel the armed timer.
    pub fn pause(&mut self, timers: &mut TimerQueue<K>) {
        self.disarm(timers);
        self.playing = false;
    }

    /// Change the interval used from the next arm onwards.
    pub fn set_speed(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// A timer tagged with this scheduler's kind came due. Returns whether
    /// the owner should advance now.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if self.pending != Some(token) {
            return false;
        }
        self.pending = None;
        self.playing
    }

    /// Arm the next tick if still playing and nothing is pending.
    pub fn rearm(&mut self, timers: &mut TimerQueue<K>) {
        if self.playing && self.pending.is_none() {
            self.arm(timers);
        }
    }

    fn arm(&mut self, timers: &mut TimerQueue<K>) {
        if self.interval.is_zero() {
            tracing::debug!("autoplay interval is zero, not scheduling");
            self.playing = false;
            return;
        }
        self.pending = Some(timers.schedule(self.kind, self.interval));
    }

    fn disarm(&mut self, timers: &mut TimerQueue<K>) {
        if let Some(token) = self.pending.take() {
            timers.cancel(token);
        }
    }
}
