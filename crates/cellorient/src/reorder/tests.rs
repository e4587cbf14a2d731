//! End-to-end tests of the reordering pipeline and its properties.

use std::collections::BTreeMap;

use proptest::prelude::*;

use super::*;
use crate::sample::{mobius_strip, ring, scramble, structured_grid, ReplayToken};
use crate::verify::{conflicting_edges, is_rotation_of, tour_conflicts};

fn rot(r: u8) -> Rotation {
    Rotation::new(r).unwrap()
}

/// First assignment, in counting order, that leaves no conflicting edge.
fn exhaustive_rotations(cells: &[QuadVertices]) -> Option<Vec<Rotation>> {
    let n = cells.len();
    (0..1usize << (2 * n)).find_map(|code| {
        let rots: Vec<Rotation> = (0..n).map(|i| rot(((code >> (2 * i)) & 3) as u8)).collect();
        let rotated: Vec<QuadVertices> = cells.iter().zip(&rots).map(|(c, r)| r.apply(*c)).collect();
        conflicting_edges(&rotated).is_empty().then_some(rots)
    })
}

fn reversed(cell: QuadVertices) -> QuadVertices {
    [cell[0], cell[3], cell[2], cell[1]]
}

fn block_with_reversed_corner() -> Vec<QuadVertices> {
    // 6 7 8
    // 3 4 5
    // 0 1 2      last cell listed the other way round
    vec![[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [8, 5, 4, 7]]
}

#[test]
fn two_by_two_block_with_reversed_cell() {
    let cells = block_with_reversed_corner();
    let sol = find_rotations(2, &cells, SearchCfg::default()).unwrap();
    assert_eq!(sol.rotations, vec![rot(0), rot(0), rot(0), rot(2)]);
    assert_eq!(sol.renumbering.len(), 4);
    assert_eq!(sol.stats.max_depth, 4);
    let rotated = sol.rotated(&cells);
    assert_eq!(rotated[3], [4, 7, 8, 5]);
    assert!(conflicting_edges(&rotated).is_empty());
}

#[test]
fn input_conflicts_before_solving() {
    assert_eq!(conflicting_edges(&block_with_reversed_corner()), vec![(4, 5), (4, 7)]);
}

#[test]
fn reorder_in_place_on_vectors() {
    let mut cells: Vec<Vec<VertexId>> = block_with_reversed_corner()
        .into_iter()
        .map(|c| c.to_vec())
        .collect();
    let stats = reorder_cells(2, &mut cells, SearchCfg::default()).unwrap();
    assert_eq!(cells[3], vec![4, 7, 8, 5]);
    assert_eq!(stats.backtracks, 0);
}

#[test]
fn mobius_strips_are_unsatisfiable() {
    for n in [3, 4, 7] {
        let err = find_rotations(2, &mobius_strip(n), SearchCfg::default()).unwrap_err();
        assert_eq!(err, OrientError::Unsatisfiable, "n = {n}");
    }
}

#[test]
fn forced_first_cell_matches_exhaustive_search() {
    let base = [[0, 1, 2, 3], [3, 2, 5, 4], [4, 5, 2, 1]];
    for start in Rotation::all() {
        let mut cells = base;
        cells[0] = start.apply(cells[0]);
        let expected = exhaustive_rotations(&cells);
        assert!(expected.is_some());
        let sol = find_rotations(2, &cells, SearchCfg::default()).unwrap();
        assert!(conflicting_edges(&sol.rotated(&cells)).is_empty(), "start {start:?}");
    }
}

#[test]
fn backjumps_can_miss_a_solution() {
    let cells = [[2, 4, 3, 0], [3, 2, 5, 0], [2, 3, 1, 5], [4, 5, 1, 2]];
    assert!(exhaustive_rotations(&cells).is_some());
    let err = find_rotations(2, &cells, SearchCfg::default()).unwrap_err();
    assert_eq!(err, OrientError::Unsatisfiable);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic]
fn rotated_rejects_a_different_cell_count() {
    let cells = block_with_reversed_corner();
    let sol = find_rotations(2, &cells, SearchCfg::default()).unwrap();
    let _ = sol.rotated(&cells[..3]);
}

#[test]
fn rings_are_solvable() {
    for n in [3, 5, 8] {
        let scrambled = scramble(&ring(n), ReplayToken::new(11, n as u64), false);
        let sol = find_rotations(2, &scrambled.cells, SearchCfg::default()).unwrap();
        assert!(conflicting_edges(&sol.rotated(&scrambled.cells)).is_empty());
    }
}

#[test]
fn disjoint_cells_are_disconnected() {
    let cells: [QuadVertices; 2] = [[0, 1, 2, 3], [4, 5, 6, 7]];
    let err = find_rotations(2, &cells, SearchCfg::default()).unwrap_err();
    assert_eq!(
        err,
        OrientError::DisconnectedMesh {
            reached: 1,
            total: 2
        }
    );
}

#[test]
fn other_dimensions_are_rejected_before_any_work() {
    // would also be malformed; the dimension check must win
    let cells = vec![vec![0u32, 1, 2, 3, 4, 5, 6, 7]];
    for dim in [1, 3] {
        let err = find_rotations(dim, &cells, SearchCfg::default()).unwrap_err();
        assert_eq!(err, OrientError::DimensionUnsupported { dim });
    }
}

#[test]
fn wrong_arity_is_malformed() {
    let cells = vec![vec![0u32, 1, 2, 3], vec![1, 2, 5]];
    let err = find_rotations(2, &cells, SearchCfg::default()).unwrap_err();
    assert_eq!(
        err,
        OrientError::MalformedMesh(crate::error::MalformedMesh::WrongArity { cell: 1, len: 3 })
    );
}

#[test]
fn failed_reorder_leaves_cells_untouched() {
    let mut cells = mobius_strip(3);
    let before = cells.clone();
    assert!(reorder_cells(2, &mut cells, SearchCfg::default()).is_err());
    assert_eq!(cells, before);
}

#[test]
fn empty_mesh_is_trivially_consistent() {
    let cells: Vec<QuadVertices> = Vec::new();
    let sol = find_rotations(2, &cells, SearchCfg::default()).unwrap();
    assert!(sol.rotations.is_empty());
    assert!(sol.renumbering.is_empty());
}

#[test]
fn boundary_faces_never_block() {
    // a lone cell accepts rotation 0 whatever corner it starts at
    for start in Rotation::all() {
        let cell = start.apply([10, 20, 30, 40]);
        let sol = find_rotations(2, &[cell], SearchCfg::default()).unwrap();
        assert_eq!(sol.rotations, vec![Rotation::ZERO]);
    }
}

#[test]
fn registry_canonicalization_on_grid() {
    let grid = structured_grid(5, 4);
    let (reg, _) = build_registry(&grid).unwrap();
    let mut per_edge: BTreeMap<(VertexId, VertexId), Vec<FaceId>> = BTreeMap::new();
    for (id, rec) in reg.records() {
        per_edge.entry(rec.key.canonical()).or_default().push(id);
    }
    // 5*5 horizontal + 6*4 vertical edges
    assert_eq!(per_edge.len(), 49);
    for ids in per_edge.values() {
        assert_eq!(ids.len(), 2);
        assert_eq!(reg.get(ids[0]).reverse, ids[1]);
        assert_eq!(reg.get(ids[1]).reverse, ids[0]);
    }
}

#[test]
fn scrambled_grid_recovers_without_backtracking() {
    let grid = structured_grid(12, 9);
    let scrambled = scramble(&grid, ReplayToken::new(2024, 0), true);
    let sol = find_rotations(2, &scrambled.cells, SearchCfg::default()).unwrap();
    let rotated = sol.rotated(&scrambled.cells);
    assert!(conflicting_edges(&rotated).is_empty());
    // rotations never flip a tour, so the counterclockwise listing survives
    assert!(tour_conflicts(&rotated).is_empty());
    assert_eq!(sol.stats.backtracks, 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn solutions_satisfy_invariant(
        nx in 1usize..8,
        ny in 1usize..8,
        seed in any::<u64>(),
        shuffle in any::<bool>(),
    ) {
        let scrambled = scramble(&structured_grid(nx, ny), ReplayToken::new(seed, 0), shuffle);
        let sol = find_rotations(2, &scrambled.cells, SearchCfg::default()).unwrap();
        let rotated = sol.rotated(&scrambled.cells);
        prop_assert!(conflicting_edges(&rotated).is_empty());
        for (before, after) in scrambled.cells.iter().zip(&rotated) {
            prop_assert!(is_rotation_of(*before, *after).is_some());
        }
    }

    #[test]
    fn three_cells_on_six_vertices_match_exhaustive_search(
        perms in proptest::collection::vec(
            Just((0..6).collect::<Vec<VertexId>>()).prop_shuffle(),
            3,
        ),
    ) {
        let cells: Vec<QuadVertices> = perms.iter().map(|p| [p[0], p[1], p[2], p[3]]).collect();
        let solved = match find_rotations(2, &cells, SearchCfg::default()) {
            Ok(sol) => {
                prop_assert!(conflicting_edges(&sol.rotated(&cells)).is_empty());
                true
            }
            Err(OrientError::Unsatisfiable) => false,
            // non-manifold or disconnected draw
            Err(_) => return Ok(()),
        };
        prop_assert_eq!(solved, exhaustive_rotations(&cells).is_some(), "{:?}", cells);
    }

    #[test]
    fn patches_with_reversed_cells_match_exhaustive_search(
        shape in 0usize..6,
        flips in any::<[bool; 6]>(),
        seed in any::<u64>(),
    ) {
        let base = match shape {
            0 => structured_grid(3, 2),
            1 => structured_grid(2, 3),
            2 => ring(5),
            3 => ring(6),
            4 => mobius_strip(5),
            _ => mobius_strip(6),
        };
        let listed: Vec<QuadVertices> = base
            .iter()
            .zip(flips)
            .map(|(&c, flip)| if flip { reversed(c) } else { c })
            .collect();
        let cells = scramble(&listed, ReplayToken::new(seed, 3), false).cells;
        let solved = find_rotations(2, &cells, SearchCfg::default()).is_ok();
        prop_assert_eq!(solved, exhaustive_rotations(&cells).is_some(), "{:?}", cells);
    }

    #[test]
    fn solving_is_deterministic(nx in 1usize..6, ny in 1usize..6, seed in any::<u64>()) {
        let scrambled = scramble(&structured_grid(nx, ny), ReplayToken::new(seed, 1), true);
        let a = find_rotations(2, &scrambled.cells, SearchCfg::default()).unwrap();
        let b = find_rotations(2, &scrambled.cells, SearchCfg::default()).unwrap();
        prop_assert_eq!(a.rotations, b.rotations);
        prop_assert_eq!(a.renumbering, b.renumbering);
        prop_assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn renumbering_is_a_bijection(nx in 1usize..8, ny in 1usize..8, seed in any::<u64>()) {
        let scrambled = scramble(&structured_grid(nx, ny), ReplayToken::new(seed, 2), true);
        let sol = find_rotations(2, &scrambled.cells, SearchCfg::default()).unwrap();
        let r = &sol.renumbering;
        prop_assert_eq!(r.len(), nx * ny);
        for i in 0..r.len() {
            prop_assert_eq!(r.old_id(r.new_id(CellId(i))), CellId(i));
            prop_assert_eq!(r.new_id(r.old_id(CellId(i))), CellId(i));
        }
        let mut seen: Vec<usize> = r.new_of_old().iter().map(|c| c.0).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..nx * ny).collect::<Vec<_>>());
    }
}
