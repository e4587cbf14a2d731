//! Backtracking rotation search over the presorted cells.
//!
//! The search keeps a stack of rotation states, one per placed cell. A cell is
//! placed by claiming the four face records of its stacked rotation; a claim
//! is legal only while no placed cell uses any of those faces in the opposite
//! direction. When all four rotations of a cell fail, the stack unwinds to the
//! cell's precomputed backtrack target instead of just the previous cell.
//!
//! Control flow is an explicit state machine so that arbitrarily long chains
//! of backjumps never grow the call stack.

use crate::error::OrientError;

use super::registry::FaceRegistry;
use super::types::{Cell, CellId, Rotation, SearchCfg, SearchStats};

/// Search phases; `Backtrack` carries the cell to unwind to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Extend,
    Check,
    Backtrack(CellId),
    Success,
    Failure,
}

/// Outcome of a successful search.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Rotation per cell, in presorted order.
    pub rotations: Vec<Rotation>,
    pub stats: SearchStats,
}

/// Runner carrying the exclusively owned registry, the stack and counters.
struct Solver<'a> {
    cells: &'a [Cell],
    registry: &'a mut FaceRegistry,
    cfg: SearchCfg,
    stack: Vec<Rotation>,
    stats: SearchStats,
}

impl<'a> Solver<'a> {
    fn new(cells: &'a [Cell], registry: &'a mut FaceRegistry, cfg: SearchCfg) -> Self {
        Self {
            cells,
            registry,
            cfg,
            stack: Vec::with_capacity(cells.len()),
            stats: SearchStats::default(),
        }
    }

    #[inline]
    fn claim(&mut self, k: usize, rot: Rotation) {
        self.registry.claim(self.cells[k].faces_at(rot));
    }

    #[inline]
    fn unclaim(&mut self, k: usize, rot: Rotation) {
        self.registry.unclaim(self.cells[k].faces_at(rot));
    }

    fn note_depth(&mut self) {
        let depth = self.stack.len();
        if depth > self.stats.max_depth {
            if self.stats.max_depth % 10 == 0 {
                tracing::trace!(depth, steps = self.stats.steps, "new max depth");
            }
            self.stats.max_depth = depth;
        }
    }

    fn run(mut self) -> Result<SearchOutcome, OrientError> {
        let n = self.cells.len();
        if n == 0 {
            return Ok(SearchOutcome {
                rotations: Vec::new(),
                stats: self.stats,
            });
        }

        // Cell 0 needs no claim check; later backtracks may still advance it.
        self.stack.push(Rotation::ZERO);
        self.claim(0, Rotation::ZERO);
        self.note_depth();

        let mut phase = Phase::Extend;
        loop {
            if let Some(budget) = self.cfg.max_steps {
                if self.stats.steps >= budget {
                    tracing::debug!(steps = self.stats.steps, "search budget exhausted");
                    return Err(OrientError::SearchExhausted {
                        steps: self.stats.steps,
                    });
                }
            }
            self.stats.steps += 1;

            phase = match phase {
                Phase::Extend => {
                    if self.stack.len() == n {
                        Phase::Success
                    } else {
                        self.stack.push(Rotation::ZERO);
                        Phase::Check
                    }
                }
                Phase::Check => self.check_top(),
                Phase::Backtrack(target) => self.backtrack(target),
                Phase::Success => {
                    tracing::debug!(
                        steps = self.stats.steps,
                        backtracks = self.stats.backtracks,
                        "orientation found"
                    );
                    return Ok(SearchOutcome {
                        rotations: self.stack,
                        stats: self.stats,
                    });
                }
                Phase::Failure => {
                    tracing::debug!(steps = self.stats.steps, "no orientation exists");
                    return Err(OrientError::Unsatisfiable);
                }
            };
        }
    }

    /// Try the topmost (unclaimed) cell in its stacked rotation.
    fn check_top(&mut self) -> Phase {
        self.note_depth();
        let k = self.stack.len() - 1;
        let rot = self.stack[k];
        if self.registry.claimable(self.cells[k].faces_at(rot)) {
            self.claim(k, rot);
            return Phase::Extend;
        }
        match rot.next() {
            Some(next) => {
                self.stack[k] = next;
                Phase::Check
            }
            None => {
                // Nothing was claimed for this cell yet.
                self.stack.pop();
                Phase::Backtrack(self.cells[k].track_back_to)
            }
        }
    }

    /// Unwind every cell above `target`, then advance `target` itself or keep
    /// unwinding from its own target once it has run out of rotations.
    ///
    /// Running cell 0 out of rotations ends the search.
    fn backtrack(&mut self, target: CellId) -> Phase {
        self.stats.backtracks += 1;
        debug_assert!(target.0 < self.stack.len());
        while self.stack.len() > target.0 + 1 {
            let k = self.stack.len() - 1;
            let rot = self.stack[k];
            self.unclaim(k, rot);
            self.stack.pop();
        }
        let rot = self.stack[target.0];
        self.unclaim(target.0, rot);
        match rot.next() {
            Some(next) => {
                self.stack[target.0] = next;
                Phase::Check
            }
            None if target.0 == 0 => {
                self.stack.pop();
                Phase::Failure
            }
            None => {
                self.stack.pop();
                Phase::Backtrack(self.cells[target.0].track_back_to)
            }
        }
    }
}

/// Search rotation states for presorted `cells` with backtrack targets set.
///
/// The registry's usage counters are left in whatever state the search ended
/// in; the registry is meant to be discarded afterwards.
pub fn solve(
    cells: &[Cell],
    registry: &mut FaceRegistry,
    cfg: SearchCfg,
) -> Result<SearchOutcome, OrientError> {
    Solver::new(cells, registry, cfg).run()
}
