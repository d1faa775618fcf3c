pub mod scene_graph;
pub mod xr_runtime;

pub use scene_graph::*;
pub use xr_runtime::*;
