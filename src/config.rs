//! Tunable parameters for floors, mesh generation and pathfinding.
//!
//! Every struct has a `Default` matching the stock floor plan, and the whole
//! set can be read from or written to RON.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::graph::SearchAlgorithm;
use crate::math::NODE_RADIUS;

/// Geometry of a single floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    /// Width of the outer rectangle.
    pub width: f64,
    /// Height of the outer rectangle.
    pub height: f64,
    /// Clearance radius around every wall vertex.
    pub node_radius: f64,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            width: 1.75,
            height: 1.0,
            node_radius: NODE_RADIUS,
        }
    }
}

impl FloorConfig {
    /// Squared distance below which two points snap to the same vertex.
    #[must_use]
    pub fn snap_distance_squared(&self) -> f64 {
        (2.0 * self.node_radius).powi(2)
    }

    /// Squared clearance a wall must keep from vertices and other walls.
    #[must_use]
    pub fn clearance_squared(&self) -> f64 {
        self.node_radius.powi(2)
    }
}

/// How routes are searched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingOptions {
    /// Search used inside a floor's navigation graph.
    pub primary_algorithm: SearchAlgorithm,
    /// Search used on the link graph between floors.
    pub link_algorithm: SearchAlgorithm,
    /// Weight same-floor link edges by exact path cost instead of straight-line distance.
    pub precompute_link_dist: bool,
    /// Cost of moving between two links that share an id.
    pub link_weight: f64,
}

impl PathfindingOptions {
    /// Checks that the options describe a usable search.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLinkWeight`] unless `link_weight` is
    /// positive and finite. A zero weight would read as a missing edge.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.link_weight.is_finite() && self.link_weight > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidLinkWeight(self.link_weight))
        }
    }
}

impl Default for PathfindingOptions {
    fn default() -> Self {
        Self {
            primary_algorithm: SearchAlgorithm::AStar,
            link_algorithm: SearchAlgorithm::Dijkstra,
            precompute_link_dist: false,
            link_weight: 0.1,
        }
    }
}

/// Top-level configuration for a [`Map`](crate::map::Map).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub floor: FloorConfig,
    /// Interpolated navigation vertices per synthetic mesh edge.
    pub verts_per_edge: usize,
    /// Maximum distance from a click to a navigation edge for edits.
    pub edit_threshold: f64,
    pub pathfinding: PathfindingOptions,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            floor: FloorConfig::default(),
            verts_per_edge: 1,
            edit_threshold: 0.01,
            pathfinding: PathfindingOptions::default(),
        }
    }
}

impl MapConfig {
    /// Parses a configuration from RON text. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid RON for this
    /// struct, or [`ConfigError::InvalidLinkWeight`] if the link weight is
    /// unusable.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.pathfinding.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed RON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
