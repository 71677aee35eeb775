#![forbid(unsafe_code)]

//! The carousel engine consumed by the view layer.
//!
//! [`Carousel`] composes breakpoint resolution, the slide index model,
//! autoplay, and swipe recognition behind one navigation authority: arrows,
//! dots, keys, swipes, and autoplay ticks all end up in the same commit path,
//! so there is never more than one way the current slide changes.
//!
//! # Driving time
//!
//! The engine owns all of its timers (autoplay, transition unlock, clone
//! correction) in a virtual-time queue. The host advances it with
//! [`tick`](Carousel::tick) (elapsed duration) or
//! [`tick_at`](Carousel::tick_at) (wall-clock sample), typically once per
//! frame. Tests advance by exact amounts.
//!
//! # Host wiring
//!
//! The engine registers no listeners of its own. The host forwards:
//!
//! - resizes to [`notify_viewport_changed`](Carousel::notify_viewport_changed)
//!   (debounced on the host side),
//! - key presses to [`notify_key_down`](Carousel::notify_key_down),
//! - pointer events to `notify_pointer_*`.
//!
//! # Invariants
//!
//! 1. `current_slide() < total_slides()` whenever there are slides.
//! 2. At most one transition is in flight; requests arriving meanwhile are
//!    dropped, not queued.
//! 3. `on_before_slide_change(old, new)` fires before the index moves and
//!    `on_slide_change(new)` after, for every accepted change and only then.
//! 4. After [`teardown`](Carousel::teardown) no timer fires and every
//!    command is a no-op.

use std::fmt;
use std::time::Duration;

use web_time::Instant;

use crate::autoplay::AutoplayScheduler;
use crate::breakpoint::{self, SlideLayout};
use crate::config::CarouselConfig;
use crate::gesture::{DragSession, SwipeDecision};
use crate::index::{LoopPhase, NavPlan, Rejection, SlideIndexModel};
use crate::keyboard::{KeyAction, NavKey};
use crate::timer::{FrameClock, TimerQueue, TimerToken};

/// Timers owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Autoplay,
    Transition,
    Correction,
}

/// What asked for a navigation. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavCause {
    Command,
    Keyboard,
    Swipe,
    Autoplay,
    Dot,
}

type BeforeChangeFn = Box<dyn FnMut(usize, usize)>;
type ChangeFn = Box<dyn FnMut(usize)>;
type InitFn = Box<dyn FnOnce(&CarouselState)>;

/// Read-only view of the engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    /// Real index of the current slide.
    pub current_slide: usize,
    /// Number of real slides.
    pub total_slides: usize,
    /// At the first slide (never while looping).
    pub is_first: bool,
    /// At the last stop (never while looping).
    pub is_last: bool,
    /// A transition is in flight.
    pub is_transitioning: bool,
    /// Autoplay is running.
    pub is_playing: bool,
    /// Layout currently in effect.
    pub layout: SlideLayout,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds a [`Carousel`] with optional notification callbacks.
pub struct CarouselBuilder {
    config: CarouselConfig,
    on_before_slide_change: Option<BeforeChangeFn>,
    on_slide_change: Option<ChangeFn>,
    on_init: Option<InitFn>,
}

impl fmt::Debug for CarouselBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CarouselBuilder {
    /// Called with `(old, new)` before every accepted index change.
    #[must_use]
    pub fn on_before_slide_change(mut self, f: impl FnMut(usize, usize) + 'static) -> Self {
        self.on_before_slide_change = Some(Box::new(f));
        self
    }

    /// Called with the new index after every accepted index change.
    #[must_use]
    pub fn on_slide_change(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_slide_change = Some(Box::new(f));
        self
    }

    /// Called once, after construction, with the initial state.
    #[must_use]
    pub fn on_init(mut self, f: impl FnOnce(&CarouselState) + 'static) -> Self {
        self.on_init = Some(Box::new(f));
        self
    }

    /// Construct the engine. Never fails; out-of-range values are corrected.
    #[must_use]
    pub fn build(self) -> Carousel {
        let config = self.config;
        let layout = resolve_layout(&config, config.viewport_width);
        let model = SlideIndexModel::new(
            config.item_count,
            layout,
            config.infinite,
            config.initial_slide,
        );
        let mut carousel = Carousel {
            model,
            timers: TimerQueue::new(),
            autoplay: AutoplayScheduler::new(TimerKind::Autoplay, config.autoplay_interval()),
            drag: DragSession::new(),
            frame_clock: FrameClock::new(),
            viewport_width: config.viewport_width,
            transition_timer: None,
            hover_paused: false,
            torn_down: false,
            on_before_slide_change: self.on_before_slide_change,
            on_slide_change: self.on_slide_change,
            config,
        };

        if carousel.config.autoplay {
            carousel.autoplay.play(&mut carousel.timers);
        }

        tracing::debug!(
            items = carousel.model.item_count(),
            current = carousel.model.real_index(),
            slides_to_show = layout.slides_to_show,
            slides_to_scroll = layout.slides_to_scroll,
            loops = carousel.model.loops(),
            playing = carousel.autoplay.is_playing(),
            "carousel initialized"
        );

        if let Some(on_init) = self.on_init {
            on_init(&carousel.snapshot());
        }
        carousel
    }
}

fn resolve_layout(config: &CarouselConfig, width: Option<u32>) -> SlideLayout {
    let base = config.base_layout();
    match width {
        Some(width) => breakpoint::resolve(&config.responsive, width, base),
        None => base,
    }
}

// ---------------------------------------------------------------------------
// Carousel
// ---------------------------------------------------------------------------

/// Responsive carousel navigation engine.
pub struct Carousel {
    config: CarouselConfig,
    model: SlideIndexModel,
    timers: TimerQueue<TimerKind>,
    autoplay: AutoplayScheduler<TimerKind>,
    drag: DragSession,
    frame_clock: FrameClock,
    viewport_width: Option<u32>,
    /// Pending transition or correction timer.
    transition_timer: Option<TimerToken>,
    /// Autoplay was paused by hover and resumes on leave.
    hover_paused: bool,
    torn_down: bool,
    on_before_slide_change: Option<BeforeChangeFn>,
    on_slide_change: Option<ChangeFn>,
}

impl fmt::Debug for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("current", &self.model.real_index())
            .field("items", &self.model.item_count())
            .field("phase", &self.model.phase())
            .field("playing", &self.autoplay.is_playing())
            .field("pending_timers", &self.timers.len())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl Carousel {
    /// Build an engine without callbacks.
    #[must_use]
    pub fn new(config: CarouselConfig) -> Self {
        Self::builder(config).build()
    }

    /// Start building an engine.
    #[must_use]
    pub fn builder(config: CarouselConfig) -> CarouselBuilder {
        CarouselBuilder {
            config,
            on_before_slide_change: None,
            on_slide_change: None,
            on_init: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl Carousel {
    /// Real index of the current slide (never a clone).
    #[inline]
    #[must_use]
    pub fn current_slide(&self) -> usize {
        self.model.real_index()
    }

    /// Number of real slides.
    #[inline]
    #[must_use]
    pub fn total_slides(&self) -> usize {
        self.model.item_count()
    }

    /// At the first slide. Always false while looping.
    #[inline]
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.model.is_first()
    }

    /// At the last stop. Always false while looping.
    #[inline]
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.model.is_last()
    }

    /// Whether a transition is in flight.
    #[inline]
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.model.is_transitioning()
    }

    /// Whether autoplay is running.
    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.autoplay.is_playing()
    }

    /// Layout currently in effect.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> SlideLayout {
        self.model.layout()
    }

    /// Last viewport width reported by the host.
    #[inline]
    #[must_use]
    pub fn viewport_width(&self) -> Option<u32> {
        self.viewport_width
    }

    /// Index into the clone-padded track.
    #[inline]
    #[must_use]
    pub fn virtual_index(&self) -> usize {
        self.model.virtual_index()
    }

    /// Slides in each clone block the view must render (0 when not looping).
    #[inline]
    #[must_use]
    pub fn clone_count(&self) -> usize {
        self.model.clone_count()
    }

    /// Transition state machine phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> LoopPhase {
        self.model.phase()
    }

    /// Whether the view should animate to the current virtual index, as
    /// opposed to jumping there.
    #[inline]
    #[must_use]
    pub fn should_animate(&self) -> bool {
        self.model.phase().animates()
    }

    /// Real indices inside the visible window.
    #[must_use]
    pub fn visible_range(&self) -> Vec<usize> {
        self.model.visible_range()
    }

    /// Number of pagination dots.
    #[must_use]
    pub fn dot_count(&self) -> usize {
        self.model.dot_count()
    }

    /// Active pagination dot.
    #[must_use]
    pub fn current_dot(&self) -> usize {
        self.model.current_dot()
    }

    /// Whether a pointer session has moved past the swipe threshold.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Live pointer displacement along the carousel axis.
    #[must_use]
    pub fn drag_offset(&self) -> f32 {
        self.drag.offset(self.config.axis())
    }

    /// Engine virtual time.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Configuration the engine was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[inline]
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// All read-side state at once.
    #[must_use]
    pub fn snapshot(&self) -> CarouselState {
        CarouselState {
            current_slide: self.current_slide(),
            total_slides: self.total_slides(),
            is_first: self.is_first(),
            is_last: self.is_last(),
            is_transitioning: self.is_transitioning(),
            is_playing: self.is_playing(),
            layout: self.layout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Navigation commands
// ---------------------------------------------------------------------------

impl Carousel {
    /// Step forward. Returns whether the slide changed.
    pub fn next_slide(&mut self) -> bool {
        self.step_next(NavCause::Command)
    }

    /// Step backward. Returns whether the slide changed.
    pub fn prev_slide(&mut self) -> bool {
        self.step_prev(NavCause::Command)
    }

    /// Animate to `index` (clamped). Returns whether the slide changed.
    pub fn go_to_slide(&mut self, index: usize) -> bool {
        self.jump(index, false, NavCause::Command)
    }

    /// Jump to `index` (clamped) without animation. Accepted even while a
    /// transition is in flight, which it cancels.
    pub fn go_to_slide_immediate(&mut self, index: usize) -> bool {
        self.jump(index, true, NavCause::Command)
    }

    /// Animate to the stop behind pagination dot `dot`.
    pub fn go_to_dot(&mut self, dot: usize) -> bool {
        let target = self.model.dot_target(dot);
        self.jump(target, false, NavCause::Dot)
    }

    fn step_next(&mut self, cause: NavCause) -> bool {
        let plan = self.model.plan_next();
        self.commit(plan, cause)
    }

    fn step_prev(&mut self, cause: NavCause) -> bool {
        let plan = self.model.plan_prev();
        self.commit(plan, cause)
    }

    fn jump(&mut self, index: usize, immediate: bool, cause: NavCause) -> bool {
        let plan = self.model.plan_go_to(index, immediate);
        self.commit(plan, cause)
    }

    /// The single place the current slide changes.
    fn commit(&mut self, plan: Result<NavPlan, Rejection>, cause: NavCause) -> bool {
        if self.torn_down {
            return false;
        }
        let plan = match plan {
            Ok(plan) => plan,
            Err(reason) => {
                tracing::trace!(
                    ?reason,
                    ?cause,
                    current = self.model.real_index(),
                    "navigation dropped"
                );
                return false;
            }
        };

        if let Some(f) = self.on_before_slide_change.as_mut() {
            f(plan.from, plan.to);
        }
        if plan.immediate {
            self.cancel_transition_timer();
        }
        self.model.apply(plan);

        tracing::debug!(
            from = plan.from,
            to = plan.to,
            ?cause,
            wraps = plan.wraps(),
            immediate = plan.immediate,
            "slide changed"
        );

        if let Some(f) = self.on_slide_change.as_mut() {
            f(plan.to);
        }
        if !plan.immediate {
            self.start_transition();
        }
        true
    }

    fn start_transition(&mut self) {
        self.cancel_transition_timer();
        let duration = self.config.transition();
        if duration.is_zero() {
            self.advance_transition();
        } else {
            self.transition_timer = Some(self.timers.schedule(TimerKind::Transition, duration));
        }
    }

    /// Move the phase machine one step forward.
    fn advance_transition(&mut self) {
        match self.model.phase() {
            LoopPhase::Settled => {}
            LoopPhase::Animating { .. } => {
                if self.model.complete_animation() == LoopPhase::Correcting {
                    let hold = self.config.correction();
                    if hold.is_zero() {
                        self.model.finish_correction();
                    } else {
                        self.transition_timer =
                            Some(self.timers.schedule(TimerKind::Correction, hold));
                    }
                }
            }
            LoopPhase::Correcting => self.model.finish_correction(),
        }
        if !self.model.is_transitioning() {
            tracing::trace!(current = self.model.real_index(), "transition settled");
        }
    }

    fn cancel_transition_timer(&mut self) {
        if let Some(token) = self.transition_timer.take() {
            self.timers.cancel(token);
        }
    }
}

// ---------------------------------------------------------------------------
// Autoplay
// ---------------------------------------------------------------------------

impl Carousel {
    /// Start autoplay, or restart its interval if already playing.
    pub fn play(&mut self) {
        if self.torn_down {
            return;
        }
        self.hover_paused = false;
        self.autoplay.play(&mut self.timers);
        tracing::debug!(
            interval = ?self.autoplay.interval(),
            playing = self.autoplay.is_playing(),
            "autoplay play"
        );
    }

    /// Stop autoplay. The engine never resumes on its own after this.
    pub fn pause(&mut self) {
        if self.torn_down {
            return;
        }
        self.hover_paused = false;
        self.autoplay.pause(&mut self.timers);
        tracing::debug!("autoplay paused");
    }

    /// Change the autoplay interval. A running timer keeps its deadline;
    /// the new interval applies from the next tick. Zero disables
    /// scheduling.
    pub fn set_autoplay_speed(&mut self, interval: Duration) {
        self.autoplay.set_speed(interval);
    }
}

// ---------------------------------------------------------------------------
// Host entry points
// ---------------------------------------------------------------------------

impl Carousel {
    /// Advance engine time by `dt`, firing every timer that comes due in
    /// deadline order. `dt` is taken as is; hosts sampling wall-clock time
    /// should prefer [`tick_at`](Self::tick_at), which clamps long gaps.
    pub fn tick(&mut self, dt: Duration) {
        if self.torn_down {
            return;
        }
        let until = self.timers.now().saturating_add(dt);
        while let Some((token, kind)) = self.timers.pop_due(until) {
            match kind {
                TimerKind::Autoplay => {
                    if self.autoplay.on_timer(token) {
                        self.step_next(NavCause::Autoplay);
                        self.autoplay.rearm(&mut self.timers);
                    }
                }
                TimerKind::Transition | TimerKind::Correction => {
                    if self.transition_timer == Some(token) {
                        self.transition_timer = None;
                        self.advance_transition();
                    }
                }
            }
        }
        self.timers.settle(until);
    }

    /// Advance engine time to a wall-clock sample. The first sample only
    /// establishes the reference point, and a gap longer than
    /// [`MAX_FRAME_GAP`](crate::timer::MAX_FRAME_GAP) counts as a suspension:
    /// time advances by the clamped amount, so missed autoplay ticks are
    /// skipped instead of replayed.
    pub fn tick_at(&mut self, now: Instant) {
        let dt = self.frame_clock.delta(now);
        self.tick(dt);
    }

    /// Forget the last wall-clock sample. Call when the host resumes from a
    /// known suspension; the next [`tick_at`](Self::tick_at) only sets the
    /// reference point.
    pub fn reset_clock(&mut self) {
        self.frame_clock.reset();
    }

    /// The viewport was resized. Re-resolves breakpoints and applies a new
    /// layout without navigating. Returns whether the layout changed.
    pub fn notify_viewport_changed(&mut self, width: u32) -> bool {
        if self.torn_down {
            return false;
        }
        self.viewport_width = Some(width);
        let layout = resolve_layout(&self.config, Some(width));
        if layout == self.model.layout() {
            return false;
        }
        let before = self.model.real_index();
        let moved = self.model.set_layout(layout);
        tracing::debug!(
            width,
            slides_to_show = layout.slides_to_show,
            slides_to_scroll = layout.slides_to_scroll,
            gap = layout.gap,
            reclamped_from = moved.then_some(before),
            "breakpoint layout changed"
        );
        true
    }

    /// The number of slides changed. The current slide is kept, reclamped
    /// if needed, without firing callbacks.
    pub fn set_item_count(&mut self, item_count: usize) {
        if self.torn_down {
            return;
        }
        let before = self.model.real_index();
        let moved = self.model.set_item_count(item_count);
        tracing::debug!(
            items = item_count,
            reclamped_from = moved.then_some(before),
            "slide count changed"
        );
    }

    /// A key was pressed. Returns whether the key is a carousel key, so the
    /// host can suppress its default action.
    pub fn notify_key_down(&mut self, key: &str) -> bool {
        if self.torn_down || !self.config.keyboard {
            return false;
        }
        let Some(action) = NavKey::parse(key).and_then(|k| k.action(self.config.axis())) else {
            return false;
        };
        match action {
            KeyAction::Prev => self.step_prev(NavCause::Keyboard),
            KeyAction::Next => self.step_next(NavCause::Keyboard),
            KeyAction::First => self.jump(0, false, NavCause::Keyboard),
            KeyAction::Last => {
                let last = self.model.max_index();
                self.jump(last, false, NavCause::Keyboard)
            }
        };
        true
    }

    /// Pointer entered the carousel.
    pub fn notify_pointer_enter(&mut self) {
        if self.torn_down || !self.config.pause_on_hover || !self.autoplay.is_playing() {
            return;
        }
        self.autoplay.pause(&mut self.timers);
        self.hover_paused = true;
        tracing::debug!("autoplay paused on hover");
    }

    /// Pointer left the carousel. Resumes autoplay only if hovering paused
    /// it.
    pub fn notify_pointer_leave(&mut self) {
        if self.torn_down || !self.hover_paused {
            return;
        }
        self.hover_paused = false;
        self.autoplay.play(&mut self.timers);
        tracing::debug!("autoplay resumed after hover");
    }

    /// Pointer pressed at `(x, y)`.
    pub fn notify_pointer_down(&mut self, x: f32, y: f32) {
        if self.torn_down || !self.config.swipe {
            return;
        }
        self.drag.press(x, y);
    }

    /// Pointer moved to `(x, y)`.
    pub fn notify_pointer_move(&mut self, x: f32, y: f32) {
        if self.torn_down || !self.config.swipe {
            return;
        }
        self.drag
            .move_to(x, y, self.config.axis(), self.config.swipe_threshold());
    }

    /// Pointer released at `(x, y)`. Returns whether the swipe navigated.
    pub fn notify_pointer_up(&mut self, x: f32, y: f32) -> bool {
        if self.torn_down || !self.config.swipe {
            return false;
        }
        let decision = self
            .drag
            .release(x, y, self.config.axis(), self.config.swipe_threshold());
        match decision {
            SwipeDecision::Prev => self.step_prev(NavCause::Swipe),
            SwipeDecision::Next => self.step_next(NavCause::Swipe),
            SwipeDecision::None => false,
        }
    }

    /// The pointer session was interrupted (e.g. focus loss).
    pub fn notify_pointer_cancel(&mut self) {
        self.drag.cancel();
    }

    /// Cancel every timer and stop responding. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.autoplay.pause(&mut self.timers);
        self.transition_timer = None;
        self.timers.clear();
        self.model.force_settle();
        self.drag.cancel();
        self.hover_paused = false;
        self.torn_down = true;
        tracing::debug!(current = self.model.real_index(), "carousel torn down");
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.teardown();
    }
}
