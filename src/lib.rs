pub mod config;
pub mod error;
pub mod floor;
pub mod graph;
pub mod map;
pub mod math;
pub mod navmesh;
pub mod topology;

pub use config::{FloorConfig, MapConfig, PathfindingOptions};
pub use error::{NavError, Result};
pub use map::{FloorId, Map};
