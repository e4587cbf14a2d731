//! Independent checks on finished cell lists.
//!
//! Edge usage is rebuilt from the vertex tuples alone, without the registry.

use std::collections::BTreeMap;

use crate::reorder::{FaceKey, QuadVertices, Rotation, VertexId};

fn edge_usage(
    cells: &[QuadVertices],
    keys_of: impl Fn(QuadVertices) -> [FaceKey; 4],
) -> Vec<(VertexId, VertexId)> {
    // canonical edge -> (seen forward, seen backward)
    let mut seen: BTreeMap<(VertexId, VertexId), (bool, bool)> = BTreeMap::new();
    for &cell in cells {
        for key in keys_of(cell) {
            let canon = key.canonical();
            let entry = seen.entry(canon).or_default();
            if key == FaceKey(canon.0, canon.1) {
                entry.0 = true;
            } else {
                entry.1 = true;
            }
        }
    }
    seen.into_iter()
        .filter(|(_, (f, b))| *f && *b)
        .map(|(edge, _)| edge)
        .collect()
}

/// Canonical edges used in both face-local directions.
///
/// Empty iff the cells satisfy the orientation invariant the solver enforces.
pub fn conflicting_edges(cells: &[QuadVertices]) -> Vec<(VertexId, VertexId)> {
    edge_usage(cells, FaceKey::slots_of)
}

/// Canonical edges traversed in the same direction by two cell tours
/// `(v0→v1→v2→v3→v0)`.
///
/// Rotations never change a tour's sense, so this depends only on how the
/// caller listed the cells.
pub fn tour_conflicts(cells: &[QuadVertices]) -> Vec<(VertexId, VertexId)> {
    let mut seen: BTreeMap<FaceKey, usize> = BTreeMap::new();
    for &v in cells {
        for i in 0..4 {
            *seen.entry(FaceKey(v[i], v[(i + 1) % 4])).or_default() += 1;
        }
    }
    seen.into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, _)| key.canonical())
        .collect()
}

/// The rotation turning `from` into `to`, if any.
pub fn is_rotation_of(from: QuadVertices, to: QuadVertices) -> Option<Rotation> {
    Rotation::all().find(|rot| rot.apply(from) == to)
}
