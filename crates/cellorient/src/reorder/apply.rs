//! Map the solved rotation stack back onto the caller's cell order.

use super::presort::Renumbering;
use super::types::{CellId, QuadVertices, Rotation};

/// Rotation of every original cell, looked up through the renumbering.
pub fn rotations_in_original_order(renumbering: &Renumbering, stack: &[Rotation]) -> Vec<Rotation> {
    debug_assert_eq!(renumbering.len(), stack.len(), "rotation stack is incomplete");
    (0..renumbering.len())
        .map(|old| stack[renumbering.new_id(CellId(old)).0])
        .collect()
}

/// Rotate each original cell by its solved amount.
pub fn apply(
    original_cells: &[QuadVertices],
    renumbering: &Renumbering,
    stack: &[Rotation],
) -> Vec<QuadVertices> {
    original_cells
        .iter()
        .zip(rotations_in_original_order(renumbering, stack))
        .map(|(&cell, rot)| rot.apply(cell))
        .collect()
}
