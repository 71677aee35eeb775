#![forbid(unsafe_code)]

//! Carousel: navigation engine for slide carousels.
//!
//! # Role in FrankenTUI
//! `ftui-carousel` decides which slide is current and when a transition may
//! happen. It renders nothing and measures nothing: the view layer reads
//! its state, renders slides (plus clone blocks when looping), and forwards
//! input back into it.
//!
//! # Primary responsibilities
//! - **Carousel**: the composition root and single navigation authority.
//! - **SlideIndexModel**: current index, wrap-around, clamping, and the
//!   transition lock.
//! - **AutoplayScheduler**: one recurring advance timer with play/pause.
//! - **Gesture / keyboard**: swipe and key decisions routed into navigation.
//! - **Breakpoints**: viewport width → visible/step counts.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ftui_carousel::{Carousel, CarouselConfig};
//!
//! let mut carousel = Carousel::new(CarouselConfig {
//!     infinite: true,
//!     transition_ms: 300,
//!     ..CarouselConfig::with_items(5)
//! });
//!
//! carousel.prev_slide();
//! assert_eq!(carousel.current_slide(), 4);
//!
//! // Navigation is locked until the transition completes.
//! assert!(!carousel.next_slide());
//! carousel.tick(Duration::from_millis(300));
//! assert!(carousel.next_slide());
//! assert_eq!(carousel.current_slide(), 0);
//! ```

pub mod autoplay;
pub mod breakpoint;
pub mod config;
pub mod controller;
pub mod gesture;
pub mod index;
pub mod keyboard;
pub mod timer;

pub use autoplay::AutoplayScheduler;
pub use breakpoint::{BreakpointRule, SlideLayout};
pub use config::{CarouselConfig, ConfigError};
pub use controller::{Carousel, CarouselBuilder, CarouselState};
pub use gesture::{Axis, DragSession, GestureSample, SwipeDecision};
pub use index::{LoopPhase, SlideIndexModel};
pub use keyboard::{KeyAction, NavKey};
pub use timer::{FrameClock, TimerQueue, TimerToken};
