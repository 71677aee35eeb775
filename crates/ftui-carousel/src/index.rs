#![forbid(unsafe_code)]

//! Slide index model: the single source of truth for which slide is current.
//!
//! [`SlideIndexModel`] owns the real index, the slide count, the active
//! [`SlideLayout`], and the [`LoopPhase`] state machine that doubles as the
//! transition lock. Navigation is split into two steps so the owner can fire
//! notifications between them:
//!
//! 1. `plan_*` computes a [`NavPlan`] without touching state, or a
//!    [`Rejection`] when the request is a no-op or must be dropped.
//! 2. [`apply`](SlideIndexModel::apply) commits the plan.
//!
//! # Loop rendering
//!
//! When looping, the view renders a clone block of `slides_to_show` items on
//! each side of the real items. The virtual index addresses that padded
//! track: `virtual = real + clone_count` while settled. Wrapping from the
//! last slide to the first animates forward into the trailing clone block,
//! then teleports back to the real position once the animation completes:
//!
//! ```text
//! Settled --apply(wrap)--> Animating { correction } --complete_animation-->
//!     Correcting --finish_correction--> Settled
//! ```
//!
//! # Invariants
//!
//! 1. `real_index < item_count` whenever `item_count > 0`; otherwise 0.
//! 2. Without looping, `real_index <= max_index()`.
//! 3. `is_transitioning()` is true exactly when the phase is not `Settled`.
//! 4. In `Settled` and `Correcting`, `virtual_index == real_index + clone_count`.
//! 5. Looping is only effective with more items than `slides_to_show`; with
//!    fewer, the carousel behaves as finite and never scrolls.

use crate::breakpoint::SlideLayout;

/// Where the model is in the transition / loop-correction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// No transition in flight; navigation is accepted.
    Settled,
    /// An animated transition is in flight.
    Animating {
        /// Virtual index to teleport to once the animation completes, when
        /// the animation ran into a clone block.
        correction: Option<usize>,
    },
    /// The view has been teleported out of a clone block and must render
    /// the jump without animation. Navigation is still locked.
    Correcting,
}

impl LoopPhase {
    /// Whether the view should animate towards the current virtual index.
    #[inline]
    #[must_use]
    pub const fn animates(self) -> bool {
        matches!(self, Self::Animating { .. })
    }
}

/// A computed, not yet committed, index change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavPlan {
    /// Real index before the change.
    pub from: usize,
    /// Real index after the change.
    pub to: usize,
    /// Virtual index the view animates towards.
    pub virtual_target: usize,
    /// Settled virtual index to jump to after a clone-block animation.
    pub correction: Option<usize>,
    /// Skip animation and the transition lock.
    pub immediate: bool,
}

impl NavPlan {
    /// Whether this plan animates into a clone block.
    #[inline]
    #[must_use]
    pub const fn wraps(&self) -> bool {
        self.correction.is_some()
    }
}

/// Why a navigation request produced no plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No slides.
    Empty,
    /// A transition is already in flight.
    Locked,
    /// The target equals the current slide (boundary or same index).
    Unchanged,
}

/// Current slide, slide count, layout, and transition lock.
#[derive(Debug, Clone)]
pub struct SlideIndexModel {
    real: usize,
    virtual_index: usize,
    item_count: usize,
    layout: SlideLayout,
    infinite: bool,
    phase: LoopPhase,
}

// ---------------------------------------------------------------------------
// Construction and queries
// ---------------------------------------------------------------------------

impl SlideIndexModel {
    /// Create a model positioned at `initial`, clamped into range.
    #[must_use]
    pub fn new(item_count: usize, layout: SlideLayout, infinite: bool, initial: usize) -> Self {
        let mut model = Self {
            real: 0,
            virtual_index: 0,
            item_count,
            layout: layout.sanitized(),
            infinite,
            phase: LoopPhase::Settled,
        };
        model.real = model.clamp_stop(initial);
        model.sync_virtual();
        model
    }

    /// Real index of the current slide.
    #[inline]
    #[must_use]
    pub fn real_index(&self) -> usize {
        self.real
    }

    /// Index into the clone-padded track the view renders.
    #[inline]
    #[must_use]
    pub fn virtual_index(&self) -> usize {
        self.virtual_index
    }

    /// Number of real slides.
    #[inline]
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Active layout.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> SlideLayout {
        self.layout
    }

    /// Whether looping was requested.
    #[inline]
    #[must_use]
    pub fn infinite(&self) -> bool {
        self.infinite
    }

    /// Whether looping is actually in effect.
    #[inline]
    #[must_use]
    pub fn loops(&self) -> bool {
        self.infinite && self.item_count > self.layout.slides_to_show
    }

    /// Current phase of the transition state machine.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Whether navigation is locked by an in-flight transition.
    #[inline]
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.phase != LoopPhase::Settled
    }

    /// Items in each clone block (0 when not looping).
    #[inline]
    #[must_use]
    pub fn clone_count(&self) -> usize {
        if self.loops() {
            self.layout.slides_to_show
        } else {
            0
        }
    }

    /// Last index a finite carousel can rest on: the start of the final
    /// full window.
    #[must_use]
    pub fn max_index(&self) -> usize {
        if self.loops() {
            self.item_count.saturating_sub(1)
        } else {
            self.item_count.saturating_sub(self.layout.slides_to_show)
        }
    }

    /// Slides moved per step, never more than the slide count.
    #[must_use]
    pub fn step(&self) -> usize {
        self.layout.slides_to_scroll.min(self.item_count).max(1)
    }

    /// At the first slide. Always false while looping.
    #[must_use]
    pub fn is_first(&self) -> bool {
        !self.loops() && self.real == 0
    }

    /// At the last reachable stop. Always false while looping.
    #[must_use]
    pub fn is_last(&self) -> bool {
        !self.loops() && self.real >= self.max_index()
    }

    /// Real indices inside the visible window, in display order.
    #[must_use]
    pub fn visible_range(&self) -> Vec<usize> {
        let count = self.item_count;
        let show = self.layout.slides_to_show.min(count);
        if self.loops() {
            (0..show).map(|i| (self.real + i) % count).collect()
        } else {
            (self.real..(self.real + show).min(count)).collect()
        }
    }

    /// Number of navigation stops (pagination dots).
    #[must_use]
    pub fn dot_count(&self) -> usize {
        if self.item_count == 0 {
            return 0;
        }
        let step = self.step();
        if self.loops() {
            self.item_count.div_ceil(step)
        } else {
            self.max_index().div_ceil(step) + 1
        }
    }

    /// The stop the current slide belongs to.
    #[must_use]
    pub fn current_dot(&self) -> usize {
        let dots = self.dot_count();
        if dots == 0 {
            return 0;
        }
        if self.is_last() {
            return dots - 1;
        }
        (self.real / self.step()).min(dots - 1)
    }

    /// Real index a pagination dot navigates to.
    #[must_use]
    pub fn dot_target(&self, dot: usize) -> usize {
        self.clamp_stop(dot.saturating_mul(self.step()))
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

impl SlideIndexModel {
    /// Plan a step forward by `slides_to_scroll`.
    pub fn plan_next(&self) -> Result<NavPlan, Rejection> {
        self.check_navigable()?;
        let step = self.step();
        let count = self.item_count;

        if !self.loops() {
            let to = (self.real + step).min(self.max_index());
            return self.plan_direct(to, false);
        }

        let unwrapped = self.real + step;
        if unwrapped < count {
            return self.plan_direct(unwrapped, false);
        }
        let to = unwrapped % count;
        if to == self.real {
            return Err(Rejection::Unchanged);
        }
        let clones = self.clone_count();
        if unwrapped < count + clones {
            Ok(NavPlan {
                from: self.real,
                to,
                virtual_target: clones + unwrapped,
                correction: Some(clones + to),
                immediate: false,
            })
        } else {
            self.plan_direct(to, false)
        }
    }

    /// Plan a step backward by `slides_to_scroll`.
    pub fn plan_prev(&self) -> Result<NavPlan, Rejection> {
        self.check_navigable()?;
        let step = self.step();
        let count = self.item_count;

        if self.real >= step {
            return self.plan_direct(self.real - step, false);
        }
        if !self.loops() {
            return self.plan_direct(0, false);
        }

        let to = (self.real + count - step) % count;
        if to == self.real {
            return Err(Rejection::Unchanged);
        }
        let clones = self.clone_count();
        let deficit = step - self.real;
        if deficit <= clones {
            Ok(NavPlan {
                from: self.real,
                to,
                virtual_target: clones - deficit,
                correction: Some(clones + to),
                immediate: false,
            })
        } else {
            self.plan_direct(to, false)
        }
    }

    /// Plan a jump to `index`, clamped into range.
    ///
    /// An `immediate` jump is accepted even while a transition is in flight.
    pub fn plan_go_to(&self, index: usize, immediate: bool) -> Result<NavPlan, Rejection> {
        if self.item_count == 0 {
            return Err(Rejection::Empty);
        }
        if self.is_transitioning() && !immediate {
            return Err(Rejection::Locked);
        }
        self.plan_direct(self.clamp_stop(index), immediate)
    }

    fn check_navigable(&self) -> Result<(), Rejection> {
        if self.item_count == 0 {
            return Err(Rejection::Empty);
        }
        if self.is_transitioning() {
            return Err(Rejection::Locked);
        }
        Ok(())
    }

    fn plan_direct(&self, to: usize, immediate: bool) -> Result<NavPlan, Rejection> {
        if to == self.real {
            return Err(Rejection::Unchanged);
        }
        Ok(NavPlan {
            from: self.real,
            to,
            virtual_target: to + self.clone_count(),
            correction: None,
            immediate,
        })
    }

    fn clamp_stop(&self, index: usize) -> usize {
        if self.item_count == 0 {
            return 0;
        }
        index.min(self.item_count - 1).min(self.max_index())
    }

    fn sync_virtual(&mut self) {
        self.virtual_index = self.real + self.clone_count();
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

impl SlideIndexModel {
    /// Commit a plan produced by this model.
    pub fn apply(&mut self, plan: NavPlan) {
        self.real = plan.to;
        if plan.immediate {
            self.phase = LoopPhase::Settled;
            self.sync_virtual();
        } else {
            self.virtual_index = plan.virtual_target;
            self.phase = LoopPhase::Animating {
                correction: plan.correction,
            };
        }
    }

    /// The visible animation finished. Returns the new phase: `Correcting`
    /// if the view must now teleport out of a clone block, else `Settled`.
    pub fn complete_animation(&mut self) -> LoopPhase {
        if let LoopPhase::Animating { correction } = self.phase {
            match correction {
                Some(settled) => {
                    self.virtual_index = settled;
                    self.phase = LoopPhase::Correcting;
                }
                None => self.phase = LoopPhase::Settled,
            }
        }
        self.phase
    }

    /// The teleport has been rendered; release the lock.
    pub fn finish_correction(&mut self) {
        if self.phase == LoopPhase::Correcting {
            self.phase = LoopPhase::Settled;
        }
    }

    /// Drop any in-flight transition and snap to the real position.
    pub fn force_settle(&mut self) {
        self.phase = LoopPhase::Settled;
        self.sync_virtual();
    }

    /// Change the layout without navigating. The current slide is kept,
    /// reclamped if it is no longer a valid stop. Returns whether the real
    /// index moved.
    pub fn set_layout(&mut self, layout: SlideLayout) -> bool {
        self.layout = layout.sanitized();
        self.reconcile()
    }

    /// Change the slide count without navigating. Returns whether the real
    /// index moved.
    pub fn set_item_count(&mut self, item_count: usize) -> bool {
        self.item_count = item_count;
        self.reconcile()
    }

    fn reconcile(&mut self) -> bool {
        let before = self.real;
        self.real = self.clamp_stop(self.real);
        // A pending clone correction is meaningless under a new track shape.
        // A correction already under way stays an unanimated jump.
        if matches!(self.phase, LoopPhase::Animating { .. }) {
            self.phase = LoopPhase::Animating { correction: None };
        }
        self.sync_virtual();
        self.real != before
    }
}
