//! Locality presort: breadth-first renumbering of the cell graph.
//!
//! Cells that are close in the mesh end up close in the search order, which
//! keeps backtracking jumps short. The renumbering is applied to every place
//! that stores a cell index (cell table, neighbor arrays, registry adjacency).

use crate::error::OrientError;

use super::registry::FaceRegistry;
use super::types::{Cell, CellId};

/// Bijection between original cell indices and presorted positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Renumbering {
    new_of_old: Vec<CellId>,
    old_of_new: Vec<CellId>,
}

impl Renumbering {
    pub fn identity(n: usize) -> Self {
        let ids: Vec<CellId> = (0..n).map(CellId).collect();
        Self {
            new_of_old: ids.clone(),
            old_of_new: ids,
        }
    }

    /// Build from the forward map; `None` unless it is a permutation of `[0, n)`.
    pub fn from_new_of_old(new_of_old: Vec<CellId>) -> Option<Self> {
        let n = new_of_old.len();
        let mut old_of_new = vec![None; n];
        for (old, &new) in new_of_old.iter().enumerate() {
            let slot = old_of_new.get_mut(new.0)?;
            if slot.is_some() {
                return None;
            }
            *slot = Some(CellId(old));
        }
        let old_of_new = old_of_new.into_iter().collect::<Option<Vec<_>>>()?;
        Some(Self {
            new_of_old,
            old_of_new,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.new_of_old.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.new_of_old.is_empty()
    }
    #[inline]
    pub fn new_id(&self, old: CellId) -> CellId {
        self.new_of_old[old.0]
    }
    #[inline]
    pub fn old_id(&self, new: CellId) -> CellId {
        self.old_of_new[new.0]
    }
    pub fn new_of_old(&self) -> &[CellId] {
        &self.new_of_old
    }
    pub fn old_of_new(&self) -> &[CellId] {
        &self.old_of_new
    }
    pub fn inverse(&self) -> Self {
        Self {
            new_of_old: self.old_of_new.clone(),
            old_of_new: self.new_of_old.clone(),
        }
    }
}

/// Pick the BFS seed: fewest neighbors, lowest index on ties. One neighbor
/// cannot be beaten in a mesh of more than one cell, so scanning stops there.
fn seed_cell(cells: &[Cell]) -> usize {
    let mut best = 0;
    let mut min_neighbors = cells[0].count_neighbors();
    for (i, cell) in cells.iter().enumerate().skip(1) {
        let n = cell.count_neighbors();
        if n < min_neighbors {
            min_neighbors = n;
            best = i;
            if n == 1 {
                break;
            }
        }
    }
    best
}

/// Compute the BFS order without touching the cells.
fn bfs_order(cells: &[Cell]) -> Result<Vec<CellId>, OrientError> {
    let n = cells.len();
    let seed = seed_cell(cells);
    let mut new_numbers: Vec<Option<CellId>> = vec![None; n];
    let mut round = vec![seed];
    let mut next_free = 0;
    while !round.is_empty() {
        for &old in &round {
            debug_assert!(new_numbers[old].is_none(), "cell {old} numbered twice");
            new_numbers[old] = Some(CellId(next_free));
            next_free += 1;
        }
        let mut next: Vec<usize> = round
            .iter()
            .flat_map(|&old| cells[old].neighbors.iter().flatten())
            .map(|nb| nb.0)
            .filter(|&nb| new_numbers[nb].is_none())
            .collect();
        // A cell can border several cells of the current round.
        next.sort_unstable();
        next.dedup();
        round = next;
    }
    tracing::debug!(seed, reached = next_free, total = n, "presort traversal");
    new_numbers
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(OrientError::DisconnectedMesh {
            reached: next_free,
            total: n,
        })
}

/// Renumber `cells` in breadth-first order and rewrite every stored cell index.
///
/// Fails with `DisconnectedMesh` if the traversal cannot reach all cells.
pub fn presort(cells: &mut Vec<Cell>, registry: &mut FaceRegistry) -> Result<Renumbering, OrientError> {
    if cells.is_empty() {
        return Ok(Renumbering::identity(0));
    }
    let order = bfs_order(cells)?;
    let renumbering = Renumbering::from_new_of_old(order).ok_or(OrientError::DisconnectedMesh {
        reached: 0,
        total: cells.len(),
    })?;

    let mut old_cells = std::mem::take(cells);
    old_cells.sort_by_key(|c| renumbering.new_id(c.id));
    for cell in old_cells.iter_mut() {
        cell.id = renumbering.new_id(cell.id);
        for nb in cell.neighbors.iter_mut().flatten() {
            *nb = renumbering.new_id(*nb);
        }
    }
    *cells = old_cells;
    debug_assert!(cells.iter().enumerate().all(|(i, c)| c.id == CellId(i)));
    registry.renumber(&renumbering);
    Ok(renumbering)
}

/// Store in each cell the highest-numbered neighbor below it, falling back to
/// the previous cell (cell 0 points at itself and is never backtracked into).
pub fn assign_backtrack_targets(cells: &mut [Cell]) {
    for cell in cells.iter_mut() {
        let own = cell.id;
        cell.track_back_to = cell
            .neighbors
            .iter()
            .flatten()
            .copied()
            .filter(|nb| *nb < own)
            .max()
            .unwrap_or(CellId(own.0.saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::neighbors::resolve_neighbors;
    use crate::reorder::registry::build_registry;
    use crate::reorder::QuadVertices;

    fn prepared(quads: &[QuadVertices]) -> (FaceRegistry, Vec<Cell>) {
        let (reg, mut cells) = build_registry(quads).unwrap();
        resolve_neighbors(&mut cells, &reg);
        (reg, cells)
    }

    #[test]
    fn seed_prefers_one_neighbor_cell() {
        // strip listed middle-first: cells 1 and 2 are the ends
        let quads = [[1, 2, 6, 5], [0, 1, 5, 4], [2, 3, 7, 6]];
        let (mut reg, mut cells) = prepared(&quads);
        let renum = presort(&mut cells, &mut reg).unwrap();
        assert_eq!(renum.new_of_old(), &[CellId(1), CellId(0), CellId(2)]);
        assert_eq!(cells[0].vertices, [0, 1, 5, 4]);
        assert_eq!(cells[0].neighbors, [None, Some(CellId(1)), None, None]);
    }

    #[test]
    fn registry_adjacency_follows_renumbering() {
        let quads = [[1, 2, 6, 5], [0, 1, 5, 4], [2, 3, 7, 6]];
        let (mut reg, mut cells) = prepared(&quads);
        presort(&mut cells, &mut reg).unwrap();
        let f = reg.find(crate::reorder::FaceKey(1, 5)).unwrap();
        assert_eq!(reg.get(f).adjacent, [Some(CellId(1)), Some(CellId(0))]);
    }

    #[test]
    fn disconnected_pair_is_reported() {
        let (mut reg, mut cells) = prepared(&[[0, 1, 2, 3], [4, 5, 6, 7]]);
        let err = presort(&mut cells, &mut reg).unwrap_err();
        assert_eq!(
            err,
            OrientError::DisconnectedMesh {
                reached: 1,
                total: 2
            }
        );
    }

    #[test]
    fn backtrack_targets() {
        // 2x2 block
        let quads = [[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [4, 5, 8, 7]];
        let (mut reg, mut cells) = prepared(&quads);
        presort(&mut cells, &mut reg).unwrap();
        assign_backtrack_targets(&mut cells);
        let targets: Vec<usize> = cells.iter().map(|c| c.track_back_to.0).collect();
        assert_eq!(targets, vec![0, 0, 0, 2]);
    }

    #[test]
    fn renumbering_rejects_non_permutations() {
        assert!(Renumbering::from_new_of_old(vec![CellId(0), CellId(0)]).is_none());
        assert!(Renumbering::from_new_of_old(vec![CellId(2), CellId(0)]).is_none());
        let r = Renumbering::from_new_of_old(vec![CellId(2), CellId(0), CellId(1)]).unwrap();
        assert_eq!(r.old_id(r.new_id(CellId(1))), CellId(1));
        assert_eq!(r.inverse().inverse(), r);
    }
}
