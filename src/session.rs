//! "Enter VR / Exit VR" toggle.
//!
//! Tracks whether immersive VR is available and whether a session is running.
//! Failures are reported to the caller and never stop the viewer; an
//! unsupported device simply hides the toggle.

use log::{info, warn};

use crate::error::SessionError;
use crate::traits::{SessionFeatures, SessionMode, XrRuntime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Capability check not run yet
    #[default]
    Unknown,
    /// Immersive VR unavailable; the toggle stays hidden
    Unsupported,
    Ready,
    Presenting,
}

#[derive(Debug, Clone)]
pub struct SessionToggle {
    state: SessionState,
    features: SessionFeatures,
}

impl SessionToggle {
    pub fn new(features: SessionFeatures) -> Self {
        Self {
            state: SessionState::Unknown,
            features,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Button text, or `None` while the toggle should be hidden
    pub fn label(&self) -> Option<&'static str> {
        match self.state {
            SessionState::Ready => Some("Enter VR"),
            SessionState::Presenting => Some("Exit VR"),
            SessionState::Unknown | SessionState::Unsupported => None,
        }
    }

    /// Asks the runtime for immersive-VR support. A failing check counts as unsupported.
    pub async fn check_support<R: XrRuntime>(&mut self, runtime: &R) -> SessionState {
        self.state = match runtime.is_session_supported(SessionMode::ImmersiveVr).await {
            Ok(true) if runtime.is_presenting() => SessionState::Presenting,
            Ok(true) => SessionState::Ready,
            Ok(false) => {
                info!("Immersive VR not supported, continuing without it");
                SessionState::Unsupported
            }
            Err(err) => {
                warn!("VR capability check failed: {}", err);
                SessionState::Unsupported
            }
        };
        self.state
    }

    /// Enters VR, or exits it while presenting
    pub async fn toggle<R: XrRuntime>(&mut self, runtime: &mut R) -> Result<SessionState, SessionError> {
        if runtime.is_presenting() {
            runtime.end_session();
            self.session_ended();
            return Ok(self.state);
        }

        match self.state {
            SessionState::Unsupported => return Err(SessionError::Unsupported),
            SessionState::Unknown => {
                if self.check_support(runtime).await == SessionState::Unsupported {
                    return Err(SessionError::Unsupported);
                }
            }
            SessionState::Ready | SessionState::Presenting => {}
        }

        match runtime.request_session(SessionMode::ImmersiveVr, &self.features).await {
            Ok(()) => {
                self.session_started();
                Ok(self.state)
            }
            Err(SessionError::Unsupported) => {
                warn!("Runtime rejected immersive VR as unsupported");
                self.state = SessionState::Unsupported;
                Err(SessionError::Unsupported)
            }
            Err(err) => {
                warn!("Failed to start VR session: {}", err);
                self.state = SessionState::Ready;
                Err(err)
            }
        }
    }

    /// Host notification that a session began outside of `toggle`
    pub fn session_started(&mut self) {
        info!("VR session started");
        self.state = SessionState::Presenting;
    }

    /// Host notification that the session ended (user exit or runtime loss)
    pub fn session_ended(&mut self) {
        if self.state == SessionState::Presenting {
            info!("VR session ended");
            self.state = SessionState::Ready;
        }
    }
}

impl Default for SessionToggle {
    fn default() -> Self {
        Self::new(SessionFeatures::gallery_default())
    }
}
