use std::collections::BTreeMap;

use tracing::info;

use super::Map;
use crate::error::{MapError, Result};
use crate::navmesh::NavigationMesh;

/// How a mesh generation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum GenerationOutcome {
    /// Every floor got a new mesh.
    Completed,
    /// The progress callback asked to stop; no mesh was replaced.
    Cancelled,
}

impl Map {
    /// Builds a navigation mesh for every floor.
    ///
    /// Meshes are staged and only replace the current ones once every floor is
    /// done. `progress` is called with the fraction of floors finished after
    /// each floor and once more with `1.0`; returning `false` from any call
    /// cancels the run. A completed run drops the link graph, so
    /// [`join_links`](Self::join_links) must follow before routing between
    /// floors.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MeshGeneration`] naming the floor whose walls could
    /// not be split into regions. Nothing is replaced in that case.
    #[allow(clippy::cast_precision_loss)]
    pub fn generate_nav_meshes(
        &mut self,
        verts_per_edge: usize,
        mut progress: impl FnMut(f64) -> bool,
    ) -> Result<GenerationOutcome> {
        let total = self.floors.len();
        let mut staged = BTreeMap::new();

        for (done, (&id, floor)) in self.floors.iter().enumerate() {
            let mesh = NavigationMesh::build(&floor.wall_graph(), floor.links(), verts_per_edge)
                .map_err(|source| MapError::MeshGeneration { floor: id, source })?
                .with_edit_threshold(self.config.edit_threshold);
            staged.insert(id, mesh);

            if !progress((done + 1) as f64 / total as f64) {
                info!(floor = id, "navigation mesh generation cancelled");
                return Ok(GenerationOutcome::Cancelled);
            }
        }

        if !progress(1.0) {
            info!("navigation mesh generation cancelled");
            return Ok(GenerationOutcome::Cancelled);
        }

        self.nav_meshes = staged;
        self.clear_link_graph();
        info!(floors = total, verts_per_edge, "navigation meshes generated");
        Ok(GenerationOutcome::Completed)
    }

    /// Builds every mesh with the configured vertex density and no progress reporting.
    ///
    /// # Errors
    ///
    /// See [`generate_nav_meshes`](Self::generate_nav_meshes).
    pub fn generate(&mut self) -> Result<GenerationOutcome> {
        self.generate_nav_meshes(self.config.verts_per_edge, |_| true)
    }
}
