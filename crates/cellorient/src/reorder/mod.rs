//! Cell reordering: rotate quadrilaterals so that shared edges agree.
//!
//! Purpose
//! - Given quadrilateral cells whose vertex lists start at arbitrary corners,
//!   find for every cell a cyclic rotation such that each interior edge is
//!   used in the same face-local direction by both cells bordering it.
//!
//! Pipeline
//! - `registry`: intern every directed face of every rotation state.
//! - `neighbors`: derive the cell across each face.
//! - `presort`: breadth-first renumbering to keep backjumps short, plus the
//!   per-cell backtrack targets.
//! - `search`: stack-based backtracking over rotation states.
//! - `apply`: map the solved stack back to the caller's order.
//!
//! Only two dimensions are implemented. The face bookkeeping below relies on
//! the two parallel side pairs of a quadrilateral and does not carry over to
//! hexahedra, so other dimensions are rejected up front.

mod apply;
mod neighbors;
mod presort;
mod registry;
mod search;
mod types;

pub use apply::{apply, rotations_in_original_order};
pub use neighbors::resolve_neighbors;
pub use presort::{assign_backtrack_targets, presort, Renumbering};
pub use registry::{build_registry, FaceRegistry};
pub use search::{solve, SearchOutcome};
pub use types::{
    Cell, CellId, FaceId, FaceKey, FaceRecord, QuadVertices, Rotation, SearchCfg, SearchStats,
    VertexId, FACES_PER_CELL, ROTATIONS_PER_CELL,
};

use crate::error::{MalformedMesh, OrientError};

/// The only mesh dimension the solver handles.
pub const SUPPORTED_DIM: usize = 2;

/// Solved rotations together with the search order that produced them.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Rotation per cell, in the caller's order.
    pub rotations: Vec<Rotation>,
    pub renumbering: Renumbering,
    pub stats: SearchStats,
}

impl Solution {
    /// Apply the rotations to `cells`, which must be the solved input.
    pub fn rotated(&self, cells: &[QuadVertices]) -> Vec<QuadVertices> {
        debug_assert_eq!(cells.len(), self.rotations.len());
        cells
            .iter()
            .zip(&self.rotations)
            .map(|(&c, rot)| rot.apply(c))
            .collect()
    }
}

fn quads_from<C: AsRef<[VertexId]>>(dim: usize, cells: &[C]) -> Result<Vec<QuadVertices>, OrientError> {
    if dim != SUPPORTED_DIM {
        return Err(OrientError::DimensionUnsupported { dim });
    }
    cells
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let v = c.as_ref();
            QuadVertices::try_from(v).map_err(|_| {
                OrientError::from(MalformedMesh::WrongArity {
                    cell: i,
                    len: v.len(),
                })
            })
        })
        .collect()
}

/// Find a rotation for every cell such that all shared edges agree.
///
/// `dim` must be 2 and every cell must list exactly four vertices.
pub fn find_rotations<C: AsRef<[VertexId]>>(
    dim: usize,
    cells: &[C],
    cfg: SearchCfg,
) -> Result<Solution, OrientError> {
    let quads = quads_from(dim, cells)?;
    let (mut registry, mut table) = build_registry(&quads)?;
    resolve_neighbors(&mut table, &registry);
    let renumbering = presort(&mut table, &mut registry)?;
    assign_backtrack_targets(&mut table);
    let outcome = solve(&table, &mut registry, cfg)?;
    Ok(Solution {
        rotations: rotations_in_original_order(&renumbering, &outcome.rotations),
        renumbering,
        stats: outcome.stats,
    })
}

/// Rotate `cells` in place; on error they are left untouched.
pub fn reorder_cells<C>(dim: usize, cells: &mut [C], cfg: SearchCfg) -> Result<SearchStats, OrientError>
where
    C: AsRef<[VertexId]> + AsMut<[VertexId]>,
{
    let solution = find_rotations(dim, cells, cfg)?;
    for (cell, rot) in cells.iter_mut().zip(&solution.rotations) {
        rot.apply_in_place(cell.as_mut());
    }
    Ok(solution.stats)
}

#[cfg(test)]
mod tests;
