#![forbid(unsafe_code)]

//! Carousel configuration.
//!
//! [`CarouselConfig`] gathers every input the host hands the engine: slide
//! count, starting slide, looping, layout and responsive rules, autoplay,
//! transition timing, and input options. With the `config-file` feature it
//! can be loaded from TOML or JSON:
//!
//! ```toml
//! item_count = 8
//! infinite = false
//! slides_to_show = 3
//! autoplay = true
//! autoplay_speed_ms = 4000
//!
//! [[responsive]]
//! max_width = 768
//! slides_to_show = 2
//!
//! [[responsive]]
//! max_width = 480
//! slides_to_show = 1
//! ```
//!
//! The engine never rejects a config. Out-of-range values are corrected
//! when the carousel is built; [`CarouselConfig::validate`] reports them for
//! hosts that want to surface mistakes.

#[cfg(feature = "config-file")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use crate::breakpoint::{BreakpointRule, SlideLayout};
use crate::gesture::Axis;

/// Everything the engine consumes from its host.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct CarouselConfig {
    /// Number of real slides.
    pub item_count: usize,
    /// Slide shown first (clamped).
    pub initial_slide: usize,
    /// Wrap around at both ends.
    pub infinite: bool,
    /// Slides visible at once when no breakpoint applies.
    pub slides_to_show: usize,
    /// Slides moved per step when no breakpoint applies.
    pub slides_to_scroll: usize,
    /// Spacing between slides in pixels.
    pub gap: u32,
    /// Breakpoint rules, in any order.
    pub responsive: Vec<BreakpointRule>,
    /// Start autoplay on construction.
    pub autoplay: bool,
    /// Milliseconds between autoplay advances. Zero or negative disables
    /// scheduling.
    pub autoplay_speed_ms: i64,
    /// Pause autoplay while the pointer is over the carousel.
    pub pause_on_hover: bool,
    /// Length of an animated transition; navigation is locked meanwhile.
    pub transition_ms: u64,
    /// How long the unanimated clone-block teleport is held before the lock
    /// is released.
    pub correction_ms: u64,
    /// Slides move vertically.
    pub vertical: bool,
    /// Accept pointer swipes.
    pub swipe: bool,
    /// Minimum swipe displacement in pixels.
    pub swipe_threshold_px: f32,
    /// Accept keyboard navigation.
    pub keyboard: bool,
    /// Viewport width known at construction, if any.
    pub viewport_width: Option<u32>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            item_count: 0,
            initial_slide: 0,
            infinite: true,
            slides_to_show: 1,
            slides_to_scroll: 1,
            gap: 0,
            responsive: Vec::new(),
            autoplay: false,
            autoplay_speed_ms: 3000,
            pause_on_hover: true,
            transition_ms: 500,
            correction_ms: 0,
            vertical: false,
            swipe: true,
            swipe_threshold_px: 50.0,
            keyboard: true,
            viewport_width: None,
        }
    }
}

impl CarouselConfig {
    /// Config for `item_count` slides with all other values defaulted.
    #[must_use]
    pub fn with_items(item_count: usize) -> Self {
        Self {
            item_count,
            ..Self::default()
        }
    }

    /// Base layout before breakpoints, with counts floored at 1.
    #[must_use]
    pub fn base_layout(&self) -> SlideLayout {
        SlideLayout::new(self.slides_to_show, self.slides_to_scroll, self.gap)
    }

    /// Autoplay interval; zero means disabled.
    #[must_use]
    pub fn autoplay_interval(&self) -> Duration {
        u64::try_from(self.autoplay_speed_ms).map_or(Duration::ZERO, Duration::from_millis)
    }

    /// Transition length.
    #[must_use]
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Clone-correction hold.
    #[must_use]
    pub fn correction(&self) -> Duration {
        Duration::from_millis(self.correction_ms)
    }

    /// Axis slides move along.
    #[must_use]
    pub fn axis(&self) -> Axis {
        Axis::from_vertical(self.vertical)
    }

    /// Swipe threshold, with non-finite or negative values replaced by the
    /// default.
    #[must_use]
    pub fn swipe_threshold(&self) -> f32 {
        if self.swipe_threshold_px.is_finite() && self.swipe_threshold_px >= 0.0 {
            self.swipe_threshold_px
        } else {
            Self::default().swipe_threshold_px
        }
    }

    /// List values the engine will have to correct.
    ///
    /// An empty list means the config is used as written.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.slides_to_show == 0 {
            errors.push("slides_to_show must be at least 1".to_string());
        }
        if self.slides_to_scroll == 0 {
            errors.push("slides_to_scroll must be at least 1".to_string());
        }
        if self.item_count > 0 && self.initial_slide >= self.item_count {
            errors.push(format!(
                "initial_slide {} is out of range for {} slides",
                self.initial_slide, self.item_count
            ));
        }
        if self.autoplay && self.autoplay_speed_ms <= 0 {
            errors.push(format!(
                "autoplay_speed_ms must be positive when autoplay is enabled, got {}",
                self.autoplay_speed_ms
            ));
        }
        if !self.swipe_threshold_px.is_finite() || self.swipe_threshold_px < 0.0 {
            errors.push(format!(
                "swipe_threshold_px must be a non-negative number, got {}",
                self.swipe_threshold_px
            ));
        }
        for (i, rule) in self.responsive.iter().enumerate() {
            if rule.slides_to_show == 0 {
                errors.push(format!("responsive[{i}].slides_to_show must be at least 1"));
            }
            if rule.slides_to_scroll == Some(0) {
                errors.push(format!(
                    "responsive[{i}].slides_to_scroll must be at least 1"
                ));
            }
            if self.responsive[..i]
                .iter()
                .any(|earlier| earlier.max_width == rule.max_width)
            {
                errors.push(format!(
                    "responsive[{i}] repeats max_width {}",
                    rule.max_width
                ));
            }
        }

        errors
    }

    /// Return the config if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

/// Errors from loading or validating a [`CarouselConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading a config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Values the engine would have to correct.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
