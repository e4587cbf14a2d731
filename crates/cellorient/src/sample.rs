//! Sample quadrilateral meshes (structured grids, strips) and seeded scrambling.
//!
//! Purpose
//! - Provide reproducible inputs for tests, benchmarks and the CLI. Every
//!   scrambled mesh is fully determined by its `ReplayToken`.
//!
//! Model
//! - Generators list every cell counterclockwise starting at its lower-left
//!   corner, so their output is already consistent (rotation 0 everywhere).
//! - `scramble` rotates each cell by a random amount and can shuffle the cell
//!   order, which is what a mesh reader without a fixed corner convention
//!   hands to the solver.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::reorder::{QuadVertices, Rotation, VertexId};

/// `nx × ny` cells on a `(nx+1) × (ny+1)` lattice, row-major.
pub fn structured_grid(nx: usize, ny: usize) -> Vec<QuadVertices> {
    let id = |i: usize, j: usize| (j * (nx + 1) + i) as VertexId;
    let mut cells = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            cells.push([id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1)]);
        }
    }
    cells
}

/// Closed annulus of `n >= 3` cells between rungs `(i, n + i)`.
pub fn ring(n: usize) -> Vec<QuadVertices> {
    let (b, t) = (|i: usize| (i % n) as VertexId, |i: usize| (n + i % n) as VertexId);
    (0..n).map(|i| [b(i), b(i + 1), t(i + 1), t(i)]).collect()
}

/// Ring of `n >= 3` cells whose last cell joins the first rung upside down.
///
/// The rungs form a single chain of parallel sides that closes onto itself
/// reversed, so no rotation assignment is consistent.
pub fn mobius_strip(n: usize) -> Vec<QuadVertices> {
    let mut cells = ring(n);
    let (b, t) = (|i: usize| i as VertexId, |i: usize| (n + i) as VertexId);
    if let Some(last) = cells.last_mut() {
        *last = [b(n - 1), t(0), b(0), t(n - 1)];
    }
    cells
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Scrambled copy of a mesh together with the rotation applied to each cell.
#[derive(Clone, Debug)]
pub struct Scrambled {
    pub cells: Vec<QuadVertices>,
    /// `applied[i]` turned the source cell into `cells[i]`.
    pub applied: Vec<Rotation>,
}

/// Rotate every cell by a random amount; optionally shuffle the cell order.
pub fn scramble(cells: &[QuadVertices], tok: ReplayToken, shuffle: bool) -> Scrambled {
    let mut rng = tok.to_std_rng();
    let mut pairs: Vec<(QuadVertices, Rotation)> = cells
        .iter()
        .map(|&c| {
            let rot = Rotation::new(rng.gen_range(0..4)).unwrap_or_default();
            (rot.apply(c), rot)
        })
        .collect();
    if shuffle {
        pairs.shuffle(&mut rng);
    }
    let (cells, applied): (Vec<QuadVertices>, Vec<Rotation>) = pairs.into_iter().unzip();
    Scrambled { cells, applied }
}
