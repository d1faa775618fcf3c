use std::future::Future;

use glam::Affine3A;

use crate::error::SessionError;

/// Which hand a tracked input source is held in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Handedness {
    #[default]
    None,
    Left,
    Right,
}

/// Pose and visibility of one tracked controller for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSource {
    /// Controller-to-world transform; the pointing axis is local -Z
    pub transform: Affine3A,
    /// False while tracking is lost
    pub visible: bool,
    pub handedness: Handedness,
}

impl InputSource {
    pub fn new(transform: Affine3A) -> Self {
        Self {
            transform,
            visible: true,
            handedness: Handedness::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    ImmersiveVr,
    Inline,
}

/// Feature descriptors passed along with a session request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionFeatures {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

impl SessionFeatures {
    /// Viewer space is required; floor-relative spaces are used when offered
    pub fn gallery_default() -> Self {
        Self {
            required: vec!["viewer".to_string()],
            optional: vec!["local-floor".to_string(), "bounded-floor".to_string()],
        }
    }
}

/// XR device runtime owned by the host
pub trait XrRuntime {
    /// Switch the renderer into XR presentation mode
    fn enable_presentation(&mut self);

    /// Tracked controller in slot `index`, if hardware is connected
    fn input_source(&self, index: usize) -> Option<InputSource>;

    /// Whether an immersive session is currently running
    fn is_presenting(&self) -> bool;

    fn is_session_supported(&self, mode: SessionMode) -> impl Future<Output = Result<bool, SessionError>>;

    fn request_session(
        &mut self,
        mode: SessionMode,
        features: &SessionFeatures,
    ) -> impl Future<Output = Result<(), SessionError>>;

    fn end_session(&mut self);
}
