//! Headless stand-ins for the host: a scripted XR runtime and a scene graph
//! that records what was attached. Used by the demo binary and the tests.

use std::collections::BTreeMap;
use std::future::{ready, Future};

use glam::{Affine3A, Quat, Vec3};

use crate::controller::CONTROLLER_COUNT;
use crate::error::SessionError;
use crate::traits::{Handedness, InputSource, NodeId, SceneGraph, SceneNode, SessionFeatures, SessionMode, XrRuntime};

/// Controller pose at `position`, turned by `yaw` around +Y and tilted by
/// `pitch` around the turned X axis. Zero yaw and pitch point down -Z.
pub fn controller_pose(position: Vec3, yaw: f32, pitch: f32) -> Affine3A {
    let rotation = Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch);
    Affine3A::from_rotation_translation(rotation, position)
}

/// Scripted XR runtime
#[derive(Debug, Clone)]
pub struct SimulatedRuntime {
    sources: [Option<InputSource>; CONTROLLER_COUNT],
    supported: bool,
    request_failure: Option<String>,
    presenting: bool,
    presentation_enabled: bool,
    requests: Vec<SessionFeatures>,
}

impl SimulatedRuntime {
    /// `supported` decides the answer to immersive-VR capability checks
    pub fn new(supported: bool) -> Self {
        Self {
            sources: [None; CONTROLLER_COUNT],
            supported,
            request_failure: None,
            presenting: false,
            presentation_enabled: false,
            requests: Vec::new(),
        }
    }

    pub fn connect(&mut self, index: usize, transform: Affine3A) {
        if let Some(source) = self.sources.get_mut(index) {
            *source = Some(InputSource::new(transform));
        }
    }

    pub fn disconnect(&mut self, index: usize) {
        if let Some(source) = self.sources.get_mut(index) {
            *source = None;
        }
    }

    /// Moves a connected controller; ignored for empty slots
    pub fn set_pose(&mut self, index: usize, transform: Affine3A) {
        if let Some(Some(source)) = self.sources.get_mut(index) {
            source.transform = transform;
        }
    }

    pub fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(Some(source)) = self.sources.get_mut(index) {
            source.visible = visible;
        }
    }

    pub fn set_handedness(&mut self, index: usize, handedness: Handedness) {
        if let Some(Some(source)) = self.sources.get_mut(index) {
            source.handedness = handedness;
        }
    }

    /// Makes every later session request fail with `reason`
    pub fn deny_requests(&mut self, reason: impl Into<String>) {
        self.request_failure = Some(reason.into());
    }

    pub fn presentation_enabled(&self) -> bool {
        self.presentation_enabled
    }

    /// Feature sets of all session requests so far
    pub fn requests(&self) -> &[SessionFeatures] {
        &self.requests
    }
}

impl XrRuntime for SimulatedRuntime {
    fn enable_presentation(&mut self) {
        self.presentation_enabled = true;
    }

    fn input_source(&self, index: usize) -> Option<InputSource> {
        self.sources.get(index).copied().flatten()
    }

    fn is_presenting(&self) -> bool {
        self.presenting
    }

    fn is_session_supported(&self, mode: SessionMode) -> impl Future<Output = Result<bool, SessionError>> {
        ready(Ok(self.supported || mode == SessionMode::Inline))
    }

    fn request_session(
        &mut self,
        mode: SessionMode,
        features: &SessionFeatures,
    ) -> impl Future<Output = Result<(), SessionError>> {
        self.requests.push(features.clone());
        let outcome = if mode == SessionMode::ImmersiveVr && !self.supported {
            Err(SessionError::Unsupported)
        } else if let Some(reason) = &self.request_failure {
            Err(SessionError::RequestFailed(reason.clone()))
        } else {
            self.presenting = true;
            Ok(())
        };
        ready(outcome)
    }

    fn end_session(&mut self) {
        self.presenting = false;
    }
}

#[derive(Debug, Clone)]
struct RecordedNode {
    node: SceneNode,
    parent: Option<NodeId>,
    color: Option<[f32; 3]>,
}

/// Scene graph that only keeps track of attached nodes
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    nodes: BTreeMap<NodeId, RecordedNode>,
    next_id: u64,
}

impl RecordingScene {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id).map(|recorded| &recorded.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|recorded| recorded.parent)
    }

    /// Current color of a laser node
    pub fn line_color(&self, id: NodeId) -> Option<[f32; 3]> {
        self.nodes.get(&id).and_then(|recorded| recorded.color)
    }
}

impl SceneGraph for RecordingScene {
    fn attach(&mut self, node: SceneNode, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        let color = match &node {
            SceneNode::Laser { vertices, .. } => Some(vertices[0].color),
            _ => None,
        };
        self.nodes.insert(id, RecordedNode { node, parent, color });
        id
    }

    fn detach(&mut self, id: NodeId) {
        if self.nodes.remove(&id).is_none() {
            return;
        }
        let children: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, recorded)| recorded.parent == Some(id))
            .map(|(child, _)| *child)
            .collect();
        for child in children {
            self.detach(child);
        }
    }

    fn set_line_color(&mut self, id: NodeId, color: [f32; 3]) {
        if let Some(recorded) = self.nodes.get_mut(&id) {
            recorded.color = Some(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineVertex;

    #[test]
    fn controller_pose_yaw_turns_forward_axis() {
        let pose = controller_pose(Vec3::ZERO, std::f32::consts::FRAC_PI_2, 0.0);
        let forward = pose.transform_vector3(Vec3::NEG_Z);
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn detach_removes_children() {
        let mut scene = RecordingScene::default();
        let parent = scene.attach(SceneNode::Controller { index: 0 }, None);
        let child = scene.attach(
            SceneNode::Laser {
                index: 0,
                vertices: LineVertex::forward_segment(1.0, [0.0, 1.0, 0.0]),
            },
            Some(parent),
        );
        assert_eq!(scene.parent(child), Some(parent));
        assert_eq!(scene.line_color(child), Some([0.0, 1.0, 0.0]));

        scene.detach(parent);
        assert!(scene.is_empty());
        scene.detach(child);
    }

    #[test]
    fn runtime_reports_connected_sources_only() {
        let mut runtime = SimulatedRuntime::new(true);
        assert_eq!(runtime.input_source(0), None);
        runtime.connect(1, Affine3A::IDENTITY);
        assert!(runtime.input_source(1).is_some());
        assert_eq!(runtime.input_source(5), None);
        runtime.disconnect(1);
        assert_eq!(runtime.input_source(1), None);
    }
}
