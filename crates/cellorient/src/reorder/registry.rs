//! Directed-edge registry: every face of every rotation state, indexed by key.
//!
//! Records live in an arena addressed by `FaceId`; the map from `FaceKey` to
//! handle only exists for lookup during construction. The two directions of a
//! canonical edge are created together and point at each other through
//! `FaceRecord::reverse`, so no reference cycles are needed.

use std::collections::BTreeMap;

use crate::error::MalformedMesh;

use super::presort::Renumbering;
use super::types::{
    Cell, CellId, FaceId, FaceKey, FaceRecord, QuadVertices, FACES_PER_CELL, ROTATIONS_PER_CELL,
};

/// Arena of directed face records plus the key index.
#[derive(Clone, Debug, Default)]
pub struct FaceRegistry {
    records: Vec<FaceRecord>,
    index: BTreeMap<FaceKey, FaceId>,
}

impl FaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    #[inline]
    pub fn get(&self, id: FaceId) -> &FaceRecord {
        &self.records[id.0]
    }
    pub fn find(&self, key: FaceKey) -> Option<FaceId> {
        self.index.get(&key).copied()
    }
    pub fn records(&self) -> impl Iterator<Item = (FaceId, &FaceRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (FaceId(i), r))
    }

    /// Return the handles of `key` and its reverse, creating both on first sight.
    fn intern_pair(&mut self, key: FaceKey) -> (FaceId, FaceId) {
        if let Some(&id) = self.index.get(&key) {
            return (id, self.records[id.0].reverse);
        }
        let fwd = FaceId(self.records.len());
        let rev = FaceId(fwd.0 + 1);
        self.records.push(FaceRecord {
            key,
            adjacent: [None, None],
            reverse: rev,
            use_count: 0,
        });
        self.records.push(FaceRecord {
            key: key.reversed(),
            adjacent: [None, None],
            reverse: fwd,
            use_count: 0,
        });
        self.index.insert(key, fwd);
        self.index.insert(key.reversed(), rev);
        (fwd, rev)
    }

    /// Insert all faces of `vertices` for all rotation states and record the
    /// cell as adjacent to each of its edges.
    ///
    /// Returns the face handles per rotation state, indexed by rotation-0 slot.
    pub fn register(
        &mut self,
        cell: CellId,
        vertices: QuadVertices,
    ) -> Result<[[FaceId; FACES_PER_CELL]; ROTATIONS_PER_CELL], MalformedMesh> {
        for i in 0..4 {
            if vertices[i + 1..].contains(&vertices[i]) {
                return Err(MalformedMesh::DegenerateCell { cell });
            }
        }

        let keys = FaceKey::slots_of(vertices);
        let mut fwd = [FaceId(0); FACES_PER_CELL];
        let mut rev = [FaceId(0); FACES_PER_CELL];
        for (slot, &key) in keys.iter().enumerate() {
            let (f, r) = self.intern_pair(key);
            fwd[slot] = f;
            rev[slot] = r;
        }

        // State 2 reverses every face; states 1 and 3 flip one parallel pair each.
        let faces = [
            fwd,
            [rev[0], fwd[1], rev[2], fwd[3]],
            rev,
            [fwd[0], rev[1], fwd[2], rev[3]],
        ];

        for slot in 0..FACES_PER_CELL {
            let (f, r) = (fwd[slot], rev[slot]);
            let edge = keys[slot].canonical();
            let first = &self.records[f.0];
            if first.adjacent[0].is_none() {
                self.records[f.0].adjacent[0] = Some(cell);
                self.records[r.0].adjacent[0] = Some(cell);
                continue;
            }
            if first.reverse != r || self.records[r.0].reverse != f {
                return Err(MalformedMesh::CrossLink { edge });
            }
            if first.adjacent[1].is_some() || self.records[r.0].adjacent[1].is_some() {
                return Err(MalformedMesh::NonManifoldEdge { edge });
            }
            self.records[f.0].adjacent[1] = Some(cell);
            self.records[r.0].adjacent[1] = Some(cell);
        }
        Ok(faces)
    }

    /// Check the cross-link invariant on every record.
    pub fn validate(&self) -> Result<(), MalformedMesh> {
        for (id, rec) in self.records() {
            let edge = rec.key.canonical();
            let Some(rev) = self.records.get(rec.reverse.0) else {
                return Err(MalformedMesh::CrossLink { edge });
            };
            if rev.reverse != id || rev.key != rec.key.reversed() || rev.adjacent != rec.adjacent
            {
                return Err(MalformedMesh::CrossLink { edge });
            }
        }
        Ok(())
    }

    /// Rewrite all adjacency slots to the presorted numbering.
    pub fn renumber(&mut self, renumbering: &Renumbering) {
        for rec in self.records.iter_mut() {
            for slot in rec.adjacent.iter_mut() {
                if let Some(old) = *slot {
                    *slot = Some(renumbering.new_id(old));
                }
            }
        }
    }

    /// A face may be claimed only while nobody uses it in the opposite direction.
    #[inline]
    pub fn claimable(&self, faces: &[FaceId; FACES_PER_CELL]) -> bool {
        faces.iter().all(|f| {
            let rev = self.records[f.0].reverse;
            self.records[rev.0].use_count == 0
        })
    }

    #[inline]
    pub fn claim(&mut self, faces: &[FaceId; FACES_PER_CELL]) {
        for f in faces {
            let rec = &mut self.records[f.0];
            debug_assert!(rec.use_count < 2, "face {:?} claimed three times", rec.key);
            rec.use_count += 1;
        }
    }

    #[inline]
    pub fn unclaim(&mut self, faces: &[FaceId; FACES_PER_CELL]) {
        for f in faces {
            let rec = &mut self.records[f.0];
            debug_assert!(rec.use_count > 0, "face {:?} released while unused", rec.key);
            rec.use_count -= 1;
        }
    }
}

/// Register every cell, returning the registry and the solver's cell table
/// (neighbors and backtrack targets still unset).
pub fn build_registry(cells: &[QuadVertices]) -> Result<(FaceRegistry, Vec<Cell>), MalformedMesh> {
    let mut registry = FaceRegistry::new();
    let mut table = Vec::with_capacity(cells.len());
    for (i, &vertices) in cells.iter().enumerate() {
        let id = CellId(i);
        let faces = registry.register(id, vertices)?;
        table.push(Cell {
            vertices,
            id,
            faces,
            neighbors: [None; FACES_PER_CELL],
            track_back_to: CellId(0),
        });
    }
    registry.validate()?;
    tracing::debug!(
        cells = table.len(),
        faces = registry.len(),
        "face registry built"
    );
    Ok((registry, table))
}
