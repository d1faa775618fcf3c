pub mod catalog;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod frame;
pub mod gallery;
pub mod manager;
pub mod math;
pub mod raycast;
pub mod registry;
pub mod selection;
pub mod session;
pub mod sim;
pub mod traits;
pub mod types;

pub use config::{Config, GalleryConfig, XrConfig};
pub use controller::{ControllerSlot, TriggerState, XrEvent, CONTROLLER_COUNT};
pub use error::{ConfigError, ManagerError, RegistryError, SessionError};
pub use manager::{EventSink, Phase, XrManager};
pub use raycast::{nearest_hit, Hit};
pub use registry::{ObjectId, Payload, Registration, Registry};
pub use selection::SelectionEvent;
