#![forbid(unsafe_code)]

//! Responsive breakpoint resolution.
//!
//! A carousel shows a different number of slides depending on how wide the
//! viewport is. [`resolve`] maps a viewport width onto the [`SlideLayout`]
//! that applies at that width, given a table of [`BreakpointRule`]s and the
//! base (non-responsive) layout.
//!
//! # Invariants
//!
//! 1. The tightest rule wins: among all rules with `max_width >= width`, the
//!    one with the smallest `max_width` is applied.
//! 2. If no rule matches, the fallback layout is returned unchanged.
//! 3. The returned layout always has `slides_to_show >= 1` and
//!    `slides_to_scroll >= 1`.
//! 4. Resolution is pure; the same inputs always produce the same layout.

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

/// How many slides are visible, how far one step moves, and the spacing
/// between slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
pub struct SlideLayout {
    /// Slides visible at once.
    pub slides_to_show: usize,
    /// Slides moved per `next`/`prev` step.
    pub slides_to_scroll: usize,
    /// Spacing between adjacent slides in pixels.
    pub gap: u32,
}

impl SlideLayout {
    /// Create a layout, flooring counts at 1.
    #[must_use]
    pub fn new(slides_to_show: usize, slides_to_scroll: usize, gap: u32) -> Self {
        Self {
            slides_to_show: slides_to_show.max(1),
            slides_to_scroll: slides_to_scroll.max(1),
            gap,
        }
    }

    /// Single-slide layout with no gap.
    #[must_use]
    pub const fn single() -> Self {
        Self {
            slides_to_show: 1,
            slides_to_scroll: 1,
            gap: 0,
        }
    }

    /// Floor both counts at 1.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self::new(self.slides_to_show, self.slides_to_scroll, self.gap)
    }
}

impl Default for SlideLayout {
    fn default() -> Self {
        Self::single()
    }
}

/// A viewport-width threshold mapped to a layout override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
pub struct BreakpointRule {
    /// Largest viewport width (inclusive) this rule applies to.
    pub max_width: u32,
    /// Slides visible when this rule is active.
    pub slides_to_show: usize,
    /// Step size; defaults to `slides_to_show` when absent.
    #[cfg_attr(feature = "config-file", serde(default))]
    pub slides_to_scroll: Option<usize>,
    /// Gap override; defaults to the fallback gap when absent.
    #[cfg_attr(feature = "config-file", serde(default))]
    pub gap: Option<u32>,
}

impl BreakpointRule {
    /// Rule that only overrides `slides_to_show`.
    #[must_use]
    pub const fn new(max_width: u32, slides_to_show: usize) -> Self {
        Self {
            max_width,
            slides_to_show,
            slides_to_scroll: None,
            gap: None,
        }
    }

    /// Set an explicit step size (builder pattern).
    #[must_use]
    pub const fn with_scroll(mut self, slides_to_scroll: usize) -> Self {
        self.slides_to_scroll = Some(slides_to_scroll);
        self
    }

    /// Set an explicit gap (builder pattern).
    #[must_use]
    pub const fn with_gap(mut self, gap: u32) -> Self {
        self.gap = Some(gap);
        self
    }

    fn layout(&self, fallback: SlideLayout) -> SlideLayout {
        SlideLayout::new(
            self.slides_to_show,
            self.slides_to_scroll.unwrap_or(self.slides_to_show),
            self.gap.unwrap_or(fallback.gap),
        )
    }
}

/// Resolve the layout active at `viewport_width`.
///
/// Rules need not be pre-sorted. Ties on `max_width` go to the rule listed
/// first.
#[must_use]
pub fn resolve(
    rules: &[BreakpointRule],
    viewport_width: u32,
    fallback: SlideLayout,
) -> SlideLayout {
    rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| viewport_width <= rule.max_width)
        .min_by_key(|(order, rule)| (rule.max_width, *order))
        .map_or(fallback.sanitized(), |(_, rule)| rule.layout(fallback))
}
