//! Consistent orientation of unstructured quadrilateral meshes.
//!
//! Mesh readers hand over quadrilaterals whose vertex lists start at an
//! arbitrary corner. Finite-element code wants every edge shared by two cells
//! to point the same way in both of them. This crate finds, for each cell, the
//! cyclic rotation of its vertex list that makes that true, or reports why no
//! such rotation exists.
//!
//! Layout
//! - `reorder`: face registry, neighbor inference, presort, backtracking
//!   search and the entry points [`find_rotations`] / [`reorder_cells`].
//! - `verify`: independent checks on finished cell lists.
//! - `sample`: structured grids, strips and seeded scrambling for tests,
//!   benchmarks and experiments.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; breaking
//!   changes are fine when they improve clarity.

pub mod error;
pub mod reorder;
pub mod sample;
pub mod verify;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{MalformedMesh, OrientError};
pub use reorder::{find_rotations, reorder_cells, Rotation, SearchCfg, SearchStats, Solution};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{MalformedMesh, OrientError};
    pub use crate::reorder::{
        find_rotations, reorder_cells, QuadVertices, Renumbering, Rotation, SearchCfg,
        SearchStats, Solution, VertexId, SUPPORTED_DIM,
    };
    pub use crate::sample::{mobius_strip, ring, scramble, structured_grid, ReplayToken};
    pub use crate::verify::{conflicting_edges, is_rotation_of};
}
