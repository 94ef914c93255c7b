//! Nested Drag Coordinator - Bridges an inner reorderable list into the outer
//! container's coordinate space.
//!
//! One coordinator wraps one inner list. It:
//!
//! - measures the list's container relative to the outer scrollable on every
//!   layout, asynchronously, keeping the result in `local_vertical_offset`
//! - derives the hover offset in outer coordinates from the engine's local
//!   hover offset plus that measurement
//! - locks the outer container's scrolling while a drag is active
//! - hands the inner engine stable handlers and the live outer scroll offset
//!
//! A caller-supplied `on_container_layout` takes over layout handling, and
//! the coordinator then never measures.
//!
//! # State
//!
//! ```text
//!            layout                    measured / failed
//!   Idle ─────────────► MEASURING ─────────────────────► Idle
//!     │ drag begin                                        ▲
//!     ▼                                                   │ drag end
//!   DRAGGING ──layout──► DRAGGING|MEASURING ──measured──► DRAGGING
//! ```
//!
//! Measuring and dragging are independent, so the phase is a set of flags.
//! A layout during a drag never touches the outer lock.
//!
//! # Stale measurements
//!
//! Each layout bumps a generation counter and the request captures it along
//! with a weak reference to the coordinator. A result is applied only if the
//! coordinator is still alive and no newer layout has been requested since.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use spark_signals::{signal, Signal};

use super::context::{current_scroll_context, ScrollContext};
use super::measure::LayoutMeasurer;
use crate::error::NestError;
use crate::primitives::{
    AnimValues, CombinedOffset, DEFAULT_ACTIVATION_DISTANCE, InnerListProps, ListHandlers,
    NestableListProps, NestedAnimValues, StableCallback,
};
use crate::types::{DragBegin, DragEnd, LayoutEvent, NodeHandle};

// =============================================================================
// PHASE
// =============================================================================

bitflags! {
    /// What a coordinator is currently doing. Empty means idle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CoordinatorPhase: u8 {
        /// A layout measurement is in flight.
        const MEASURING = 1 << 0;
        /// A drag is active and the outer container is locked.
        const DRAGGING = 1 << 1;
    }
}

// =============================================================================
// CORE
// =============================================================================

/// State shared between the coordinator and its handler bodies.
struct CoordinatorCore {
    context: ScrollContext,
    measurer: Rc<dyn LayoutMeasurer>,
    handlers: RefCell<ListHandlers>,
    phase: Cell<CoordinatorPhase>,
    /// Bumped on every layout; results from older requests are dropped.
    measure_generation: Cell<u64>,
    local_vertical_offset: Signal<f32>,
    anim_values: Rc<RefCell<Option<AnimValues>>>,
    /// Bumped on every engine init so the derived offset re-reads the source.
    anim_generation: Signal<u64>,
    hover_offset: CombinedOffset,
}

impl CoordinatorCore {
    fn new(
        context: ScrollContext,
        measurer: Rc<dyn LayoutMeasurer>,
        handlers: ListHandlers,
    ) -> Self {
        let local_vertical_offset = signal(0.0_f32);
        let anim_values: Rc<RefCell<Option<AnimValues>>> = Rc::new(RefCell::new(None));
        let anim_generation = signal(0_u64);

        let hover_offset = {
            let vertical = local_vertical_offset.clone();
            let values = anim_values.clone();
            let generation = anim_generation.clone();
            CombinedOffset::derive(move || {
                let _ = generation.get();
                let local = values
                    .borrow()
                    .as_ref()
                    .map(|v| v.hover_offset.get())
                    .unwrap_or(0.0);
                local + vertical.get()
            })
        };

        Self {
            context,
            measurer,
            handlers: RefCell::new(handlers),
            phase: Cell::new(CoordinatorPhase::empty()),
            measure_generation: Cell::new(0),
            local_vertical_offset,
            anim_values,
            anim_generation,
            hover_offset,
        }
    }

    fn set_phase(&self, flag: CoordinatorPhase, on: bool) {
        let mut phase = self.phase.get();
        phase.set(flag, on);
        self.phase.set(phase);
    }

    // -------------------------------------------------------------------------
    // Measurement
    // -------------------------------------------------------------------------

    fn request_measurement(self: &Rc<Self>, container: NodeHandle) {
        // Any skipped layout still supersedes requests already in flight.
        let generation = self.measure_generation.get() + 1;
        self.measure_generation.set(generation);

        let Some(anchor) = self.context.scrollable() else {
            self.set_phase(CoordinatorPhase::MEASURING, false);
            log::warn!("cannot measure {container:?}: outer scrollable not mounted");
            return;
        };

        self.set_phase(CoordinatorPhase::MEASURING, true);

        let on_success = Rc::downgrade(self);
        let on_fail = Weak::clone(&on_success);
        self.measurer.measure_layout(
            container,
            anchor,
            Box::new(move |_x, y| {
                if let Some(core) = on_success.upgrade() {
                    core.apply_measurement(generation, y);
                }
            }),
            Box::new(move || {
                if let Some(core) = on_fail.upgrade() {
                    core.measurement_failed(generation, container, anchor);
                }
            }),
        );
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.measure_generation.get()
    }

    fn apply_measurement(&self, generation: u64, y: f32) {
        if !self.is_current(generation) {
            return;
        }
        self.set_phase(CoordinatorPhase::MEASURING, false);
        log::trace!("nested list measured at y={y}");
        self.local_vertical_offset.set(y);
    }

    fn measurement_failed(&self, generation: u64, node: NodeHandle, relative_to: NodeHandle) {
        if !self.is_current(generation) {
            return;
        }
        self.set_phase(CoordinatorPhase::MEASURING, false);
        let err = NestError::MeasurementFailed { node, relative_to };
        log::warn!("{err}; keeping vertical offset {}", self.local_vertical_offset.get());
    }

    // -------------------------------------------------------------------------
    // Drag lifecycle
    // -------------------------------------------------------------------------

    fn drag_began(&self, params: &DragBegin) {
        self.set_phase(CoordinatorPhase::DRAGGING, true);
        self.context.set_outer_scroll_enabled(false);
        log::debug!("drag began at index {}; outer scroll locked", params.index);

        let forward = self.handlers.borrow().on_drag_begin.clone();
        if let Some(on_drag_begin) = forward {
            on_drag_begin(params);
        }
    }

    fn drag_ended(&self, params: &DragEnd) {
        self.set_phase(CoordinatorPhase::DRAGGING, false);
        self.context.set_outer_scroll_enabled(true);
        log::debug!(
            "drag ended {} -> {}; outer scroll unlocked",
            params.from,
            params.to
        );

        let forward = self.handlers.borrow().on_drag_end.clone();
        if let Some(on_drag_end) = forward {
            on_drag_end(params);
        }
    }

    fn anim_values_ready(&self, values: &AnimValues) {
        *self.anim_values.borrow_mut() = Some(values.clone());
        self.anim_generation.set(self.anim_generation.get().wrapping_add(1));

        let forward = self.handlers.borrow().on_anim_val_init.clone();
        if let Some(on_anim_val_init) = forward {
            on_anim_val_init(&NestedAnimValues {
                inner: values.clone(),
                hover_offset: self.hover_offset.clone(),
            });
        }
    }

    /// A caller-supplied layout handler replaces measurement entirely.
    fn container_laid_out(self: &Rc<Self>, event: &LayoutEvent) {
        let replacement = self.handlers.borrow().on_container_layout.clone();
        match replacement {
            Some(on_container_layout) => on_container_layout(event),
            None => self.request_measurement(event.container),
        }
    }
}

// =============================================================================
// ENGINE HANDLERS
// =============================================================================

/// Stable handles given to the inner engine.
#[derive(Clone, Debug)]
struct EngineHandlers {
    on_container_layout: StableCallback<LayoutEvent>,
    on_drag_begin: StableCallback<DragBegin>,
    on_drag_end: StableCallback<DragEnd>,
    on_anim_val_init: StableCallback<AnimValues>,
}

impl EngineHandlers {
    /// Handles whose bodies reach the core weakly, so an engine outliving
    /// the coordinator calls into nothing.
    fn bind(core: &Rc<CoordinatorCore>) -> Self {
        let weak = Rc::downgrade(core);
        let on_container_layout = StableCallback::new(move |event: &LayoutEvent| {
            if let Some(core) = weak.upgrade() {
                core.container_laid_out(event);
            }
        });

        let weak = Rc::downgrade(core);
        let on_drag_begin = StableCallback::new(move |params: &DragBegin| {
            if let Some(core) = weak.upgrade() {
                core.drag_began(params);
            }
        });

        let weak = Rc::downgrade(core);
        let on_drag_end = StableCallback::new(move |params: &DragEnd| {
            if let Some(core) = weak.upgrade() {
                core.drag_ended(params);
            }
        });

        let weak = Rc::downgrade(core);
        let on_anim_val_init = StableCallback::new(move |values: &AnimValues| {
            if let Some(core) = weak.upgrade() {
                core.anim_values_ready(values);
            }
        });

        Self {
            on_container_layout,
            on_drag_begin,
            on_drag_end,
            on_anim_val_init,
        }
    }
}

// =============================================================================
// COORDINATOR
// =============================================================================

/// Coordinates one draggable list nested in an outer scroll container.
///
/// `E` is the inner engine's own configuration, passed through untouched.
pub struct NestedDragCoordinator<E = ()> {
    core: Rc<CoordinatorCore>,
    engine: EngineHandlers,
    activation_distance: Cell<Option<f32>>,
    extra: RefCell<E>,
}

impl<E: Clone> NestedDragCoordinator<E> {
    /// Create a coordinator bound to `context`.
    pub fn new(
        context: &ScrollContext,
        measurer: Rc<dyn LayoutMeasurer>,
        props: NestableListProps<E>,
    ) -> Self {
        let (handlers, activation_distance, extra) = props.split();
        let core = Rc::new(CoordinatorCore::new(context.clone(), measurer, handlers));
        let engine = EngineHandlers::bind(&core);

        Self {
            core,
            engine,
            activation_distance: Cell::new(activation_distance),
            extra: RefCell::new(extra),
        }
    }

    /// Create a coordinator bound to the innermost provided context.
    ///
    /// Fails with [`NestError::MissingProvider`] outside an outer container.
    pub fn from_context(
        measurer: Rc<dyn LayoutMeasurer>,
        props: NestableListProps<E>,
    ) -> Result<Self, NestError> {
        let context = current_scroll_context()?;
        Ok(Self::new(&context, measurer, props))
    }

    /// Re-render with new caller props.
    ///
    /// Handles previously given to the engine keep their identity and run
    /// against the new caller handlers.
    pub fn set_props(&self, props: NestableListProps<E>) {
        let (handlers, activation_distance, extra) = props.split();
        *self.core.handlers.borrow_mut() = handlers;
        self.activation_distance.set(activation_distance);
        *self.extra.borrow_mut() = extra;
    }

    /// Props for the inner reorder engine.
    pub fn inner_props(&self) -> InnerListProps<E> {
        InnerListProps {
            scroll_enabled: false,
            activation_distance: self
                .activation_distance
                .get()
                .unwrap_or(DEFAULT_ACTIVATION_DISTANCE),
            outer_scroll_offset: self.core.context.outer_scroll_offset_signal(),
            hover_offset: self.core.hover_offset.clone(),
            on_container_layout: self.engine.on_container_layout.clone(),
            on_drag_begin: self.engine.on_drag_begin.clone(),
            on_drag_end: self.engine.on_drag_end.clone(),
            on_anim_val_init: self.engine.on_anim_val_init.clone(),
            extra: self.extra.borrow().clone(),
        }
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    /// The shared scroll state this list is bound to.
    pub fn context(&self) -> &ScrollContext {
        &self.core.context
    }

    /// What the coordinator is doing right now.
    pub fn phase(&self) -> CoordinatorPhase {
        self.core.phase.get()
    }

    /// True between drag begin and drag end.
    pub fn is_dragging(&self) -> bool {
        self.phase().contains(CoordinatorPhase::DRAGGING)
    }

    /// True while the latest layout's measurement has not resolved.
    pub fn is_measuring(&self) -> bool {
        self.phase().contains(CoordinatorPhase::MEASURING)
    }

    /// Last measured position of the list inside the outer container.
    pub fn local_vertical_offset(&self) -> f32 {
        self.core.local_vertical_offset.get()
    }

    /// The measured position as a signal, for effects and deriveds.
    pub fn local_vertical_offset_signal(&self) -> Signal<f32> {
        self.core.local_vertical_offset.clone()
    }

    /// Hover offset in outer coordinates.
    pub fn hover_offset(&self) -> CombinedOffset {
        self.core.hover_offset.clone()
    }

    /// Engine values captured by the last init, if any.
    pub fn anim_values(&self) -> Option<AnimValues> {
        self.core.anim_values.borrow().clone()
    }

    // -------------------------------------------------------------------------
    // Engine events
    // -------------------------------------------------------------------------
    //
    // Same bodies as the handles in `inner_props`, for engines driven directly.

    pub fn on_container_layout(&self, container: NodeHandle) {
        self.engine
            .on_container_layout
            .call(&LayoutEvent { container });
    }

    pub fn on_drag_begin(&self, params: DragBegin) {
        self.engine.on_drag_begin.call(&params);
    }

    pub fn on_drag_end(&self, params: DragEnd) {
        self.engine.on_drag_end.call(&params);
    }

    pub fn on_anim_val_init(&self, values: AnimValues) {
        self.engine.on_anim_val_init.call(&values);
    }

    /// Tear down. In-flight measurements resolve into nothing.
    ///
    /// An active drag is not ended: the outer lock stays until the engine
    /// reports the drag end, which after unmount nobody receives.
    pub fn unmount(self) {
        if self.is_dragging() {
            log::warn!("nested list unmounted mid-drag; outer scroll stays locked");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
