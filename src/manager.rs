//! Lifecycle manager: owns both controller slots and binds picking and
//! dispatch to the host's render loop and scene graph.
//!
//! Device callbacks never touch controller state directly. They push
//! [`XrEvent`]s through an [`EventSink`]; the next [`XrManager::update`]
//! drains the queue after the pick pass, so a press is always resolved
//! against the nearest hit of the frame it is applied in. The sink only
//! accepts events between `initialize` and `dispose`.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use log::{debug, info};

use crate::config::XrConfig;
use crate::controller::{Connection, ControllerSlot, SlotNodes, XrEvent, CONTROLLER_COUNT};
use crate::error::ManagerError;
use crate::raycast::{nearest_hit, Hit};
use crate::registry::{Payload, Registry};
use crate::selection::{self, SelectionEvent, SelectionObserver};
use crate::traits::{SceneGraph, SceneNode, XrRuntime};

#[derive(Debug, Default)]
struct EventQueue {
    events: RefCell<VecDeque<XrEvent>>,
    /// Set by `initialize`; events pushed before that are refused
    accepting: Cell<bool>,
}

/// Non-blocking handle for host device callbacks. Pushes before initialize
/// or after dispose are dropped.
#[derive(Debug, Clone)]
pub struct EventSink {
    queue: Weak<EventQueue>,
}

impl EventSink {
    /// Queues `event` for the next frame. Returns false while the manager is
    /// not running.
    pub fn push(&self, event: XrEvent) -> bool {
        match self.queue.upgrade() {
            Some(queue) if queue.accepting.get() => {
                queue.events.borrow_mut().push_back(event);
                true
            }
            _ => false,
        }
    }

    pub fn select_start(&self, controller: usize) -> bool {
        self.push(XrEvent::SelectStart { controller })
    }

    pub fn select_end(&self, controller: usize) -> bool {
        self.push(XrEvent::SelectEnd { controller })
    }

    /// True while pushes would be dropped
    pub fn is_closed(&self) -> bool {
        self.queue.upgrade().map_or(true, |queue| !queue.accepting.get())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Initialized,
    Disposed,
}

pub struct XrManager {
    config: XrConfig,
    registry: Registry,
    slots: [ControllerSlot; CONTROLLER_COUNT],
    queue: Option<Rc<EventQueue>>,
    /// Reused between frames so the steady state does not allocate
    pending: Vec<XrEvent>,
    selections: Vec<SelectionEvent>,
    observer: Option<SelectionObserver>,
    phase: Phase,
}

impl XrManager {
    pub fn new(config: XrConfig) -> Self {
        Self::with_registry(config, Registry::new())
    }

    /// Uses an existing registry, e.g. one already populated by mounted panels
    pub fn with_registry(config: XrConfig, registry: Registry) -> Self {
        let slots = std::array::from_fn(|index| ControllerSlot::new(index, &config));
        Self {
            config,
            registry,
            slots,
            queue: Some(Rc::new(EventQueue::default())),
            pending: Vec::new(),
            selections: Vec::new(),
            observer: None,
            phase: Phase::Created,
        }
    }

    pub fn config(&self) -> &XrConfig {
        &self.config
    }

    /// Registry handle to pass to code that mounts selectable objects
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn controllers(&self) -> &[ControllerSlot] {
        &self.slots
    }

    pub fn controller(&self, index: usize) -> Option<&ControllerSlot> {
        self.slots.get(index)
    }

    /// Nearest hit of controller `index` from the last update
    pub fn nearest_hit(&self, index: usize) -> Option<&Hit> {
        self.slots.get(index)?.nearest_hit()
    }

    pub fn event_sink(&self) -> EventSink {
        EventSink {
            queue: self.queue.as_ref().map(Rc::downgrade).unwrap_or_default(),
        }
    }

    pub fn set_selection_observer(&mut self, observer: impl FnMut(&SelectionEvent, &Payload) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_selection_observer(&mut self) {
        self.observer = None;
    }

    /// Enables XR presentation and attaches controller, grip and laser nodes for both slots
    pub fn initialize<R: XrRuntime, S: SceneGraph>(
        &mut self,
        runtime: &mut R,
        scene: &mut S,
    ) -> Result<(), ManagerError> {
        match self.phase {
            Phase::Created => {}
            Phase::Initialized => return Err(ManagerError::AlreadyInitialized),
            Phase::Disposed => return Err(ManagerError::Disposed),
        }

        runtime.enable_presentation();

        for slot in &mut self.slots {
            let index = slot.index();
            let controller = scene.attach(SceneNode::Controller { index }, None);
            let laser = scene.attach(
                SceneNode::Laser {
                    index,
                    vertices: slot.laser().vertices(),
                },
                Some(controller),
            );
            let grip = scene.attach(SceneNode::Grip { index }, None);
            slot.set_nodes(Some(SlotNodes {
                controller,
                grip,
                laser,
            }));
        }

        if let Some(queue) = &self.queue {
            queue.accepting.set(true);
        }
        self.phase = Phase::Initialized;
        info!("XR manager initialized with {} controller slots", CONTROLLER_COUNT);
        Ok(())
    }

    /// Per-frame pass. Returns the selections dispatched during this call.
    pub fn update<R: XrRuntime, S: SceneGraph>(&mut self, runtime: &R, scene: &mut S) -> &[SelectionEvent] {
        self.selections.clear();
        if self.phase != Phase::Initialized {
            return &self.selections;
        }

        if let Some(queue) = &self.queue {
            self.pending.extend(queue.events.borrow_mut().drain(..));
        }

        for slot in &mut self.slots {
            match slot.sync_source(runtime.input_source(slot.index())) {
                Connection::Connected => info!(
                    "Controller {} connected ({:?} hand)",
                    slot.index(),
                    slot.handedness()
                ),
                Connection::Disconnected => info!("Controller {} disconnected", slot.index()),
                Connection::Unchanged => {}
            }
        }

        // Callbacks below may mutate the registry; this snapshot is unaffected
        let candidates = self.registry.list();
        for slot in &mut self.slots {
            let hit = if slot.is_active() {
                nearest_hit(&slot.ray(), &candidates, self.config.max_ray_distance)
            } else {
                None
            };
            slot.set_hit(hit);
        }

        let mut pending = std::mem::take(&mut self.pending);
        for event in pending.drain(..) {
            match event {
                XrEvent::SelectStart { controller } => {
                    let Some(slot) = self.slots.get_mut(controller) else {
                        debug!("Ignoring select-start for unknown controller {}", controller);
                        continue;
                    };
                    if !slot.press() {
                        continue;
                    }
                    if let Some(selection) =
                        selection::dispatch(controller, slot.nearest_hit(), &candidates, self.observer.as_mut())
                    {
                        self.selections.push(selection);
                    }
                }
                XrEvent::SelectEnd { controller } => match self.slots.get_mut(controller) {
                    Some(slot) => {
                        slot.release();
                    }
                    None => debug!("Ignoring select-end for unknown controller {}", controller),
                },
            }
        }
        self.pending = pending;

        for slot in &mut self.slots {
            if slot.take_tint_dirty() {
                if let Some(nodes) = slot.nodes() {
                    scene.set_line_color(nodes.laser, slot.laser().color);
                }
            }
        }

        &self.selections
    }

    /// Detaches every node and closes the event sink. Safe to call repeatedly
    /// or before `initialize`.
    pub fn dispose<S: SceneGraph>(&mut self, scene: &mut S) {
        if self.phase == Phase::Disposed {
            return;
        }

        for slot in &mut self.slots {
            if let Some(nodes) = slot.nodes().copied() {
                scene.detach(nodes.laser);
                scene.detach(nodes.controller);
                scene.detach(nodes.grip);
            }
            slot.set_nodes(None);
            slot.set_hit(None);
        }

        if let Some(queue) = self.queue.take() {
            queue.accepting.set(false);
        }
        self.pending.clear();
        self.selections.clear();
        self.observer = None;
        self.phase = Phase::Disposed;
        info!("XR manager disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Hitbox, AABB};
    use crate::sim::{RecordingScene, SimulatedRuntime};
    use glam::{Affine3A, Vec3};
    use std::cell::Cell;

    fn ready() -> (XrManager, SimulatedRuntime, RecordingScene) {
        let mut manager = XrManager::new(XrConfig::default());
        let mut runtime = SimulatedRuntime::new(true);
        let mut scene = RecordingScene::default();
        manager.initialize(&mut runtime, &mut scene).unwrap();
        (manager, runtime, scene)
    }

    #[test]
    fn initialize_attaches_three_nodes_per_slot() {
        let (manager, runtime, scene) = ready();
        assert!(runtime.presentation_enabled());
        assert_eq!(scene.len(), 3 * CONTROLLER_COUNT);
        assert_eq!(manager.phase(), Phase::Initialized);
    }

    #[test]
    fn initialize_twice_is_rejected() {
        let (mut manager, mut runtime, mut scene) = ready();
        assert_eq!(
            manager.initialize(&mut runtime, &mut scene),
            Err(ManagerError::AlreadyInitialized)
        );
    }

    #[test]
    fn laser_color_is_pushed_to_scene_on_press() {
        let (mut manager, mut runtime, mut scene) = ready();
        runtime.connect(0, Affine3A::IDENTITY);
        let sink = manager.event_sink();

        sink.select_start(0);
        manager.update(&runtime, &mut scene);
        let laser = manager.controller(0).unwrap().nodes().unwrap().laser;
        assert_eq!(scene.line_color(laser), Some([1.0, 0.0, 1.0]));

        sink.select_end(0);
        manager.update(&runtime, &mut scene);
        assert_eq!(scene.line_color(laser), Some([0.0, 1.0, 0.0]));
    }

    #[test]
    fn callback_may_unregister_during_dispatch() {
        let (mut manager, mut runtime, mut scene) = ready();
        runtime.connect(0, Affine3A::from_translation(Vec3::new(0.0, 1.5, 0.0)));

        let registry = manager.registry().clone();
        let id = registry.allocate_id();
        let calls = Rc::new(Cell::new(0));
        let guard = {
            let owner = registry.clone();
            let calls = calls.clone();
            registry
                .register(
                    id,
                    Hitbox::from_aabb(AABB::new(Vec3::new(-1.0, 1.0, -5.0), Vec3::new(1.0, 2.0, -4.0))),
                    Payload::close_panel(move || {
                        calls.set(calls.get() + 1);
                        owner.unregister(id);
                    }),
                )
                .unwrap()
        };

        manager.event_sink().select_start(0);
        assert_eq!(manager.update(&runtime, &mut scene).len(), 1);
        assert_eq!(calls.get(), 1);
        assert!(!registry.contains(id));
        assert!(!guard.is_live());
    }

    #[test]
    fn update_before_initialize_is_a_no_op() {
        let mut manager = XrManager::new(XrConfig::default());
        let mut runtime = SimulatedRuntime::new(true);
        let mut scene = RecordingScene::default();
        runtime.connect(0, Affine3A::IDENTITY);
        assert!(manager.update(&runtime, &mut scene).is_empty());
        assert!(!manager.controller(0).unwrap().is_connected());
    }

    #[test]
    fn sink_opens_on_initialize() {
        let mut manager = XrManager::new(XrConfig::default());
        let mut runtime = SimulatedRuntime::new(true);
        let mut scene = RecordingScene::default();
        let sink = manager.event_sink();

        assert!(sink.is_closed());
        assert!(!sink.select_start(0));
        manager.initialize(&mut runtime, &mut scene).unwrap();
        assert!(!sink.is_closed());
        assert!(sink.select_start(0));
    }

    #[test]
    fn dispose_before_initialize_is_safe() {
        let mut manager = XrManager::new(XrConfig::default());
        let mut scene = RecordingScene::default();
        manager.dispose(&mut scene);
        manager.dispose(&mut scene);
        assert_eq!(manager.phase(), Phase::Disposed);
        assert!(manager.event_sink().is_closed());
    }
}
