use glam::Affine3A;

use crate::config::XrConfig;
use crate::math::{hex_to_rgb, Ray};
use crate::raycast::Hit;
use crate::traits::{Handedness, InputSource, NodeId};
use crate::types::LineVertex;

/// Controller slots allocated up front, whether or not hardware shows up
pub const CONTROLLER_COUNT: usize = 2;

/// Trigger state of one controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriggerState {
    #[default]
    Idle,
    Pressed,
}

/// Change in hardware presence observed while polling a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Unchanged,
    Connected,
    Disconnected,
}

/// Device events delivered by the host between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XrEvent {
    SelectStart { controller: usize },
    SelectEnd { controller: usize },
}

/// Laser beam drawn from the controller along its pointing axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Laser {
    pub length: f32,
    pub color: [f32; 3],
    idle_color: [f32; 3],
    pressed_color: [f32; 3],
}

impl Laser {
    pub fn new(config: &XrConfig) -> Self {
        let idle_color = hex_to_rgb(config.idle_color);
        Self {
            length: config.laser_length,
            color: idle_color,
            idle_color,
            pressed_color: hex_to_rgb(config.pressed_color),
        }
    }

    pub fn vertices(&self) -> [LineVertex; 2] {
        LineVertex::forward_segment(self.length, self.color)
    }

    fn tint(&mut self, trigger: TriggerState) {
        self.color = match trigger {
            TriggerState::Idle => self.idle_color,
            TriggerState::Pressed => self.pressed_color,
        };
    }
}

/// Scene nodes created for one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotNodes {
    pub controller: NodeId,
    pub grip: NodeId,
    pub laser: NodeId,
}

/// One of the two controller slots
#[derive(Debug, Clone)]
pub struct ControllerSlot {
    index: usize,
    transform: Affine3A,
    visible: bool,
    connected: bool,
    handedness: Handedness,
    trigger: TriggerState,
    laser: Laser,
    hit: Option<Hit>,
    tint_dirty: bool,
    nodes: Option<SlotNodes>,
}

impl ControllerSlot {
    pub fn new(index: usize, config: &XrConfig) -> Self {
        Self {
            index,
            transform: Affine3A::IDENTITY,
            visible: false,
            connected: false,
            handedness: Handedness::None,
            trigger: TriggerState::Idle,
            laser: Laser::new(config),
            hit: None,
            tint_dirty: false,
            nodes: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn transform(&self) -> &Affine3A {
        &self.transform
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Connected and tracked; only active slots are ray cast
    pub fn is_active(&self) -> bool {
        self.connected && self.visible
    }

    pub fn trigger(&self) -> TriggerState {
        self.trigger
    }

    pub fn laser(&self) -> &Laser {
        &self.laser
    }

    pub fn nearest_hit(&self) -> Option<&Hit> {
        self.hit.as_ref()
    }

    pub fn ray(&self) -> Ray {
        Ray::from_transform(&self.transform)
    }

    pub fn nodes(&self) -> Option<&SlotNodes> {
        self.nodes.as_ref()
    }

    pub(crate) fn set_nodes(&mut self, nodes: Option<SlotNodes>) {
        self.nodes = nodes;
    }

    pub(crate) fn set_hit(&mut self, hit: Option<Hit>) {
        self.hit = hit;
    }

    /// Applies this frame's polled source
    pub fn sync_source(&mut self, source: Option<InputSource>) -> Connection {
        match source {
            Some(source) => {
                let was_connected = self.connected;
                self.connected = true;
                self.transform = source.transform;
                self.visible = source.visible;
                self.handedness = source.handedness;
                if was_connected {
                    Connection::Unchanged
                } else {
                    Connection::Connected
                }
            }
            None if self.connected => {
                self.connected = false;
                self.visible = false;
                self.hit = None;
                self.release();
                Connection::Disconnected
            }
            None => Connection::Unchanged,
        }
    }

    /// Select-start. Returns true on an `Idle -> Pressed` edge.
    pub fn press(&mut self) -> bool {
        if !self.connected || self.trigger == TriggerState::Pressed {
            return false;
        }
        self.set_trigger(TriggerState::Pressed);
        true
    }

    /// Select-end. Returns true on a `Pressed -> Idle` edge.
    pub fn release(&mut self) -> bool {
        if self.trigger == TriggerState::Idle {
            return false;
        }
        self.set_trigger(TriggerState::Idle);
        true
    }

    /// Whether the laser color changed since the last call
    pub(crate) fn take_tint_dirty(&mut self) -> bool {
        std::mem::take(&mut self.tint_dirty)
    }

    fn set_trigger(&mut self, trigger: TriggerState) {
        self.trigger = trigger;
        self.laser.tint(trigger);
        self.tint_dirty = true;
    }
}
