use crate::types::LineVertex;

/// Handle to a node in the host's scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Visual nodes the XR core asks the host to create
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    /// Pointer-space group that follows the controller pose
    Controller { index: usize },
    /// Grip-space group carrying the controller model
    Grip { index: usize },
    /// Laser line in the controller's local space
    Laser { index: usize, vertices: [LineVertex; 2] },
}

/// Scene graph owned by the host
pub trait SceneGraph {
    /// Attach `node` under `parent`, or under the scene root when `None`
    fn attach(&mut self, node: SceneNode, parent: Option<NodeId>) -> NodeId;

    /// Remove a node and its children. Unknown ids are ignored.
    fn detach(&mut self, id: NodeId);

    /// Recolor a line node
    fn set_line_color(&mut self, id: NodeId, color: [f32; 3]);
}
