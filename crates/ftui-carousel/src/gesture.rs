#![forbid(unsafe_code)]

//! Swipe recognition: turns a press → drag → release sequence into a
//! navigation decision.
//!
//! [`resolve`] is the pure core: given where a pointer session started and
//! where it is now, it decides [`SwipeDecision::Prev`],
//! [`SwipeDecision::Next`], or [`SwipeDecision::None`]. [`DragSession`]
//! wraps it with per-session capture so a host only has to forward raw
//! pointer coordinates.
//!
//! # Direction mapping
//!
//! Dragging content toward the start (left, or up on a vertical carousel)
//! reveals the next slide; dragging toward the end reveals the previous one.
//! The mapping is the same whether or not the carousel loops.
//!
//! # Invariants
//!
//! 1. A displacement strictly below the threshold never navigates.
//! 2. A session yields at most one decision; a second release without a new
//!    press resolves to `None`.
//! 3. Non-finite coordinates resolve to `None`.

/// Axis along which slides move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Slides move left/right.
    #[default]
    Horizontal,
    /// Slides move up/down.
    Vertical,
}

impl Axis {
    /// Axis for a `vertical` flag.
    #[inline]
    #[must_use]
    pub const fn from_vertical(vertical: bool) -> Self {
        if vertical {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

/// Outcome of a finished swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    /// Go to the previous slide.
    Prev,
    /// Go to the next slide.
    Next,
    /// Stay put.
    None,
}

/// Start and current pointer coordinates of one pointer session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSample {
    /// X at press.
    pub start_x: f32,
    /// Y at press.
    pub start_y: f32,
    /// Latest X.
    pub current_x: f32,
    /// Latest Y.
    pub current_y: f32,
}

impl GestureSample {
    /// A sample whose current position equals its start.
    #[must_use]
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            start_x: x,
            start_y: y,
            current_x: x,
            current_y: y,
        }
    }

    /// Signed displacement along `axis`.
    #[inline]
    #[must_use]
    pub fn delta(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.current_x - self.start_x,
            Axis::Vertical => self.current_y - self.start_y,
        }
    }
}

/// Decide what a swipe means.
#[must_use]
pub fn resolve(sample: &GestureSample, axis: Axis, threshold_px: f32) -> SwipeDecision {
    let delta = sample.delta(axis);
    if !delta.is_finite() || delta.abs() < threshold_px {
        return SwipeDecision::None;
    }
    if delta > 0.0 {
        SwipeDecision::Prev
    } else {
        SwipeDecision::Next
    }
}

/// Captures one pointer session at a time.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    sample: Option<GestureSample>,
    dragging: bool,
}

impl DragSession {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sample: None,
            dragging: false,
        }
    }

    /// Begin a session at `(x, y)`, discarding any unfinished one.
    pub fn press(&mut self, x: f32, y: f32) {
        self.sample = Some(GestureSample::at(x, y));
        self.dragging = false;
    }

    /// Track pointer movement. Ignored without a prior press.
    ///
    /// Marks the session as dragging once the displacement reaches
    /// `threshold_px`, so the host can suppress click handling.
    pub fn move_to(&mut self, x: f32, y: f32, axis: Axis, threshold_px: f32) {
        let Some(sample) = self.sample.as_mut() else {
            return;
        };
        sample.current_x = x;
        sample.current_y = y;
        let delta = sample.delta(axis);
        if delta.is_finite() && delta.abs() >= threshold_px {
            self.dragging = true;
        }
    }

    /// End the session at `(x, y)` and resolve it.
    pub fn release(&mut self, x: f32, y: f32, axis: Axis, threshold_px: f32) -> SwipeDecision {
        let Some(mut sample) = self.sample.take() else {
            return SwipeDecision::None;
        };
        self.dragging = false;
        sample.current_x = x;
        sample.current_y = y;
        resolve(&sample, axis, threshold_px)
    }

    /// Abandon the session without a decision.
    pub fn cancel(&mut self) {
        self.sample = None;
        self.dragging = false;
    }

    /// Whether a session is in progress.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.sample.is_some()
    }

    /// Whether the current session has moved past the threshold.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Live displacement along `axis`, for rendering the track under the
    /// pointer. Zero when idle.
    #[must_use]
    pub fn offset(&self, axis: Axis) -> f32 {
        self.sample.map_or(0.0, |s| s.delta(axis))
    }
}
