#![forbid(unsafe_code)]

//! Keyboard navigation keys.
//!
//! Hosts forward raw key names (as reported by the platform, e.g.
//! `"ArrowLeft"`). Only arrow keys along the carousel's axis plus `Home` and
//! `End` navigate; everything else is left to the host.

use std::str::FromStr;

use crate::gesture::Axis;

/// A key the carousel understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Home.
    Home,
    /// End.
    End,
}

/// What a key asks the carousel to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Step backward.
    Prev,
    /// Step forward.
    Next,
    /// Jump to the first slide.
    First,
    /// Jump to the last stop.
    Last,
}

impl NavKey {
    /// Parse a key name. Legacy short names (`"Left"`, `"Up"`, ...) are
    /// accepted too.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(Self::ArrowLeft),
            "ArrowRight" | "Right" => Some(Self::ArrowRight),
            "ArrowUp" | "Up" => Some(Self::ArrowUp),
            "ArrowDown" | "Down" => Some(Self::ArrowDown),
            "Home" => Some(Self::Home),
            "End" => Some(Self::End),
            _ => None,
        }
    }

    /// The action for this key on a carousel moving along `axis`.
    ///
    /// Arrows across the axis return `None` so the host can use them for
    /// page scrolling.
    #[must_use]
    pub const fn action(self, axis: Axis) -> Option<KeyAction> {
        match (self, axis) {
            (Self::ArrowLeft, Axis::Horizontal) | (Self::ArrowUp, Axis::Vertical) => {
                Some(KeyAction::Prev)
            }
            (Self::ArrowRight, Axis::Horizontal) | (Self::ArrowDown, Axis::Vertical) => {
                Some(KeyAction::Next)
            }
            (Self::Home, _) => Some(KeyAction::First),
            (Self::End, _) => Some(KeyAction::Last),
            _ => None,
        }
    }
}

/// Error for key names the carousel does not handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a carousel navigation key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for NavKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownKey(s.to_string()))
    }
}
