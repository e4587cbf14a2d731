//! Error taxonomy for the orientation solver.
//!
//! Every variant is terminal: the search is deterministic, so retrying with the
//! same input cannot change the outcome. Callers decide how to present failure.

use std::fmt;

use crate::reorder::{CellId, VertexId};

/// Input that cannot be turned into a consistent face registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MalformedMesh {
    /// A cell does not list exactly four vertices.
    WrongArity { cell: usize, len: usize },
    /// A cell repeats a vertex, so one of its faces collapses to a point.
    DegenerateCell { cell: CellId },
    /// More than two cells share the same canonical edge.
    NonManifoldEdge { edge: (VertexId, VertexId) },
    /// The two directed records of an edge disagree about each other.
    CrossLink { edge: (VertexId, VertexId) },
}

impl fmt::Display for MalformedMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedMesh::WrongArity { cell, len } => {
                write!(f, "cell {cell} has {len} vertices (quadrilaterals need 4)")
            }
            MalformedMesh::DegenerateCell { cell } => {
                write!(f, "cell {} repeats a vertex", cell.0)
            }
            MalformedMesh::NonManifoldEdge { edge } => write!(
                f,
                "edge ({}, {}) is shared by more than two cells",
                edge.0, edge.1
            ),
            MalformedMesh::CrossLink { edge } => write!(
                f,
                "directed records of edge ({}, {}) are not cross-linked consistently",
                edge.0, edge.1
            ),
        }
    }
}

/// Failure modes of [`crate::reorder::find_rotations`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrientError {
    /// Only two-dimensional (quadrilateral) meshes are supported.
    DimensionUnsupported { dim: usize },
    MalformedMesh(MalformedMesh),
    /// The presort traversal reached only `reached` of `total` cells.
    DisconnectedMesh { reached: usize, total: usize },
    /// The search ran out of candidates without satisfying the orientation
    /// invariant.
    ///
    /// Backjumps skip part of the assignment space, so a few solvable meshes
    /// also end here; this is not a proof that no assignment exists.
    Unsatisfiable,
    /// The step budget ran out before the search finished.
    SearchExhausted { steps: u64 },
}

impl fmt::Display for OrientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrientError::DimensionUnsupported { dim } => {
                write!(f, "dimension {dim} is not supported (only 2D quadrilaterals)")
            }
            OrientError::MalformedMesh(inner) => write!(f, "malformed mesh: {inner}"),
            OrientError::DisconnectedMesh { reached, total } => write!(
                f,
                "mesh is disconnected: presort reached {reached} of {total} cells"
            ),
            OrientError::Unsatisfiable => {
                write!(f, "search found no consistent orientation for this mesh")
            }
            OrientError::SearchExhausted { steps } => {
                write!(f, "search gave up after {steps} steps")
            }
        }
    }
}

impl std::error::Error for MalformedMesh {}

impl std::error::Error for OrientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrientError::MalformedMesh(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<MalformedMesh> for OrientError {
    fn from(err: MalformedMesh) -> Self {
        OrientError::MalformedMesh(err)
    }
}
