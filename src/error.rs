use std::path::PathBuf;

use thiserror::Error;

use crate::registry::{ObjectId, PayloadKind};

/// Registry mutation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("object {id} is registered as {existing:?}; a {incoming:?} payload cannot be merged into it")]
    KindMismatch {
        id: ObjectId,
        existing: PayloadKind,
        incoming: PayloadKind,
    },
}

/// Immersive session failures. Never fatal: the viewer keeps running without VR.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("immersive VR is not supported on this device")]
    Unsupported,
    #[error("session request failed: {0}")]
    RequestFailed(String),
}

/// Lifecycle misuse of the XR manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error("XR manager is already initialized")]
    AlreadyInitialized,
    #[error("XR manager has been disposed")]
    Disposed,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value: {0}")]
    Invalid(String),
}
