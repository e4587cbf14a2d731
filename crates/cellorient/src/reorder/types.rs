//! Data types for the face registry, the cell table and the search.
//!
//! Kept small and explicit so `registry`, `presort` and `search` read easily.

/// Opaque vertex identifier. Not required to be contiguous or sorted.
pub type VertexId = u32;

/// Vertex tuple of one quadrilateral, in the order the caller listed it.
pub type QuadVertices = [VertexId; 4];

pub const FACES_PER_CELL: usize = 4;
pub const ROTATIONS_PER_CELL: usize = 4;

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceId(pub usize);

/// One of the four cyclic rotations of a quadrilateral's vertex list.
///
/// Rotation `r` turns `(v0, v1, v2, v3)` into `(v[r], v[r+1], v[r+2], v[r+3])`
/// with indices taken mod 4, i.e. a left rotation by `r`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rotation(u8);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);
    pub const LAST: Rotation = Rotation(ROTATIONS_PER_CELL as u8 - 1);

    #[inline]
    pub fn new(r: u8) -> Option<Self> {
        ((r as usize) < ROTATIONS_PER_CELL).then_some(Self(r))
    }
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
    /// Next rotation in trial order, `None` after the last one.
    #[inline]
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
    pub fn all() -> impl Iterator<Item = Rotation> {
        (0..ROTATIONS_PER_CELL as u8).map(Rotation)
    }
    #[inline]
    pub fn apply(self, v: QuadVertices) -> QuadVertices {
        let mut out = v;
        out.rotate_left(self.index());
        out
    }
    /// Rotate an arbitrary vertex slice in place.
    #[inline]
    pub fn apply_in_place(self, v: &mut [VertexId]) {
        v.rotate_left(self.index());
    }
}

/// Directed face key. Ordering is lexicographic on `(from, to)`, so the key
/// distinguishes `(a, b)` from `(b, a)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceKey(pub VertexId, pub VertexId);

impl FaceKey {
    #[inline]
    pub fn reversed(self) -> Self {
        FaceKey(self.1, self.0)
    }
    /// Orientation-independent vertex pair (smaller id first).
    #[inline]
    pub fn canonical(self) -> (VertexId, VertexId) {
        if self.0 <= self.1 {
            (self.0, self.1)
        } else {
            (self.1, self.0)
        }
    }

    /// Directed faces of a vertex tuple, by slot.
    ///
    /// Slots 0 and 1 follow the tour, slots 2 and 3 run against it, so the
    /// two opposite sides of the quadrilateral point the same way.
    #[inline]
    pub fn slots_of(v: QuadVertices) -> [FaceKey; FACES_PER_CELL] {
        [
            FaceKey(v[0], v[1]),
            FaceKey(v[1], v[2]),
            FaceKey(v[3], v[2]),
            FaceKey(v[0], v[3]),
        ]
    }
}

/// Registry entry for one directed face.
#[derive(Clone, Debug)]
pub struct FaceRecord {
    pub key: FaceKey,
    /// Up to two cells bordering the face; `None` while unfilled.
    pub adjacent: [Option<CellId>; 2],
    /// Handle of the record with the reversed key.
    pub reverse: FaceId,
    /// Number of placed cells currently claiming this direction (0..=2).
    pub use_count: u8,
}

impl FaceRecord {
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.adjacent[1].is_none()
    }
}

/// Cell as seen by the solver.
#[derive(Clone, Debug)]
pub struct Cell {
    pub vertices: QuadVertices,
    /// Position in the current numbering (original index before presort).
    pub id: CellId,
    /// Face handles per rotation state, indexed by the rotation-0 slot.
    pub faces: [[FaceId; FACES_PER_CELL]; ROTATIONS_PER_CELL],
    pub neighbors: [Option<CellId>; FACES_PER_CELL],
    /// Cell to unwind to when every rotation of this one fails.
    pub track_back_to: CellId,
}

impl Cell {
    #[inline]
    pub fn faces_at(&self, rot: Rotation) -> &[FaceId; FACES_PER_CELL] {
        &self.faces[rot.index()]
    }
    #[inline]
    pub fn count_neighbors(&self) -> usize {
        self.neighbors.iter().filter(|n| n.is_some()).count()
    }
}

/// Search configuration.
#[derive(Clone, Copy, Debug)]
pub struct SearchCfg {
    /// Upper bound on state-machine steps; `None` searches without limit.
    /// Adversarial topologies can backtrack super-exponentially.
    pub max_steps: Option<u64>,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            max_steps: Some(50_000_000),
        }
    }
}

impl SearchCfg {
    pub fn unbounded() -> Self {
        Self { max_steps: None }
    }
}

/// Counters collected while searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub steps: u64,
    pub backtracks: u64,
    /// Deepest stack seen.
    pub max_depth: usize,
}
