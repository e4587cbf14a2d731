//! Neighbor inference from the filled registry.

use super::registry::FaceRegistry;
use super::types::{Cell, Rotation, FACES_PER_CELL};

/// Fill `neighbors[slot]` of every cell with the cell across that face.
///
/// The rotation-0 record stands in for all rotation states: every state of a
/// face resolves to the same pair of adjacent cells.
pub fn resolve_neighbors(cells: &mut [Cell], registry: &FaceRegistry) {
    for cell in cells.iter_mut() {
        for slot in 0..FACES_PER_CELL {
            let rec = registry.get(cell.faces_at(Rotation::ZERO)[slot]);
            debug_assert!(
                cell.faces
                    .iter()
                    .all(|state| registry.get(state[slot]).adjacent == rec.adjacent),
                "rotation states of one face disagree on adjacency"
            );
            cell.neighbors[slot] = if rec.adjacent[0] == Some(cell.id) {
                rec.adjacent[1]
            } else {
                rec.adjacent[0]
            };
        }
    }
}
