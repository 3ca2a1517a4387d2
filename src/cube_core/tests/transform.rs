use std::{
    collections::{HashSet, hash_map::DefaultHasher},
    hash::{Hash, Hasher},
};

use cube_core::{Axis, Cube, CubeError, CubeKind, Face, PartType, Turn, create};
use itertools::Itertools;

type Cycle = ([usize; 4], [u8; 4]);

/// Location and orientation arrays of a solved category after the given
/// disjoint four cycles. The part at `l[i + 1]` moves to `l[i]` and gains
/// `d[i]`.
fn cycled(count: usize, modulus: u8, cycles: &[Cycle]) -> (Vec<usize>, Vec<u8>) {
    let mut locations = (0..count).collect_vec();
    let mut orientations = vec![0; count];

    for &(l, d) in cycles {
        let swap = (locations[l[0]], orientations[l[0]]);
        for i in 0..3 {
            locations[l[i]] = locations[l[i + 1]];
            orientations[l[i]] = (orientations[l[i + 1]] + d[i]) % modulus;
        }
        locations[l[3]] = swap.0;
        orientations[l[3]] = (swap.1 + d[3]) % modulus;
    }

    (locations, orientations)
}

struct Expected<'a> {
    corners: &'a [Cycle],
    edges: &'a [Cycle],
    sides: &'a [Cycle],
    /// Sides that turn in place, with their orientation afterwards
    spins: &'a [(usize, u8)],
}

fn assert_turn(layer_count: usize, turn: Turn, expected: &Expected) {
    let cube = create(layer_count).unwrap();
    cube.apply(turn).unwrap();

    let corners = cycled(8, 3, expected.corners);
    assert_eq!(cube.corner_locations(), corners.0, "corners of {turn}");
    assert_eq!(cube.corner_orientations(), corners.1, "corners of {turn}");

    let edges = cycled(cube.edge_count(), 2, expected.edges);
    assert_eq!(cube.edge_locations(), edges.0, "edges of {turn}");
    assert_eq!(cube.edge_orientations(), edges.1, "edges of {turn}");

    let mut sides = cycled(cube.side_count(), 4, expected.sides);
    for &(location, orientation) in expected.spins {
        sides.1[location] = orientation;
    }
    assert_eq!(cube.side_locations(), sides.0, "sides of {turn}");
    assert_eq!(cube.side_orientations(), sides.1, "sides of {turn}");
}

const FLIP: [u8; 4] = [1; 4];

#[test_log::test]
fn classic_face_turns() {
    assert_turn(3, Turn::new(Axis::X, 4, 1), &Expected {
        corners: &[([0, 1, 3, 2], [1, 2, 1, 2])],
        edges: &[([0, 1, 2, 4], FLIP)],
        sides: &[],
        spins: &[(0, 3)],
    });
    assert_turn(3, Turn::new(Axis::Y, 4, 1), &Expected {
        corners: &[([0, 2, 4, 6], [0; 4])],
        edges: &[([0, 3, 6, 9], FLIP)],
        sides: &[],
        spins: &[(1, 3)],
    });
    assert_turn(3, Turn::new(Axis::Z, 4, 1), &Expected {
        corners: &[([6, 7, 1, 0], [1, 2, 1, 2])],
        edges: &[([9, 10, 11, 1], FLIP)],
        sides: &[],
        spins: &[(2, 3)],
    });
    assert_turn(3, Turn::new(Axis::X, 1, -1), &Expected {
        corners: &[([6, 4, 5, 7], [2, 1, 2, 1])],
        edges: &[([6, 7, 8, 10], FLIP)],
        sides: &[],
        spins: &[(3, 3)],
    });
    assert_turn(3, Turn::new(Axis::Y, 1, -1), &Expected {
        corners: &[([7, 5, 3, 1], [0; 4])],
        edges: &[([2, 11, 8, 5], FLIP)],
        sides: &[],
        spins: &[(4, 3)],
    });
    assert_turn(3, Turn::new(Axis::Z, 1, -1), &Expected {
        corners: &[([2, 3, 5, 4], [1, 2, 1, 2])],
        edges: &[([3, 4, 5, 7], FLIP)],
        sides: &[],
        spins: &[(5, 3)],
    });
}

#[test_log::test]
fn classic_middle_slices() {
    assert_turn(3, Turn::new(Axis::X, 2, 1), &Expected {
        corners: &[],
        edges: &[([3, 9, 11, 5], FLIP)],
        sides: &[([2, 4, 5, 1], [2, 3, 2, 1])],
        spins: &[],
    });
    assert_turn(3, Turn::new(Axis::Y, 2, 1), &Expected {
        corners: &[],
        edges: &[([1, 4, 7, 10], FLIP)],
        sides: &[([3, 2, 0, 5], [2, 1, 2, 3])],
        spins: &[],
    });
    assert_turn(3, Turn::new(Axis::Z, 2, 1), &Expected {
        corners: &[],
        edges: &[([0, 6, 8, 2], FLIP)],
        sides: &[([0, 1, 3, 4], [1, 2, 3, 2])],
        spins: &[],
    });
}

#[test_log::test]
fn professor_right_face() {
    assert_turn(5, Turn::new(Axis::X, 16, 1), &Expected {
        corners: &[([0, 1, 3, 2], [1, 2, 1, 2])],
        edges: &[
            ([0, 1, 2, 4], FLIP),
            ([12, 25, 26, 16], FLIP),
            ([24, 13, 14, 28], FLIP),
        ],
        sides: &[([6, 24, 18, 12], [3; 4]), ([30, 48, 42, 36], [3; 4])],
        spins: &[(0, 3)],
    });
}

#[test_log::test]
fn created_solved() {
    for layer_count in 2..=7 {
        let cube = create(layer_count).unwrap();
        assert!(cube.is_solved());
        assert_eq!(cube.layer_count(), layer_count);
        assert_eq!(cube.kind(), CubeKind::from_layer_count(layer_count).unwrap());
        assert_eq!(cube.edge_count(), 12 * (layer_count - 2));
        assert_eq!(cube.side_count(), 6 * (layer_count - 2).pow(2));
        assert!(cube.unsolved_parts().is_empty());
    }

    for layer_count in [0, 1, 8, 32] {
        assert_eq!(
            create(layer_count).unwrap_err(),
            CubeError::InvalidLayerCount(layer_count)
        );
    }
}

#[test_log::test]
fn turns_have_order_four() {
    for layer_count in 2..=7 {
        let cube = create(layer_count).unwrap();
        for axis in Axis::ALL {
            for layer in 0..layer_count {
                let mask = 1 << layer;

                for _ in 0..4 {
                    cube.transform(axis, mask, 1).unwrap();
                }
                assert!(cube.is_solved(), "{axis}:{mask}:1 on {layer_count} layers");

                cube.transform(axis, mask, 2).unwrap();
                assert!(!cube.is_solved());
                cube.transform(axis, mask, -2).unwrap();
                assert!(cube.is_solved(), "{axis}:{mask}:2 on {layer_count} layers");
            }
        }
    }
}

#[test_log::test]
fn concrete_top_layer_scenario() {
    let cube = create(3).unwrap();
    for _ in 0..3 {
        cube.transform(Axis::Y, 4, 1).unwrap();
        assert!(!cube.is_solved());
    }
    cube.transform(Axis::Y, 4, 1).unwrap();
    assert!(cube.is_solved());
}

#[test_log::test]
fn half_turns_are_two_quarter_turns() {
    let quarters = create(4).unwrap();
    let half = create(4).unwrap();
    for turn in ["x:9:1", "y:6:1", "z:1:-1", "x:2:1"] {
        let turn: Turn = turn.parse().unwrap();
        quarters.apply(turn).unwrap();
        quarters.apply(turn).unwrap();
        half.apply(Turn { angle: 2, ..turn }).unwrap();
    }
    assert_eq!(quarters, half);
}

#[test_log::test]
fn invalid_turns_are_rejected() {
    let cube = create(3).unwrap();
    assert_eq!(
        cube.transform(Axis::X, 8, 1),
        Err(CubeError::InvalidLayerMask {
            layer_mask: 8,
            layer_count: 3
        })
    );
    assert_eq!(
        cube.transform(Axis::X, 1, -3),
        Err(CubeError::InvalidAngle(-3))
    );
    cube.transform(Axis::X, 0, 1).unwrap();
    cube.transform(Axis::X, 7, 0).unwrap();
    assert!(cube.is_solved());
}

fn scrambled(layer_count: usize) -> Cube {
    let cube = create(layer_count).unwrap();
    let mut mask = 1;
    for (i, axis) in Axis::ALL.into_iter().cycle().take(20).enumerate() {
        mask = (mask * 3 + i as u32) % (1 << layer_count);
        cube.transform(axis, mask, [1, -1, 2][i % 3]).unwrap();
    }
    cube
}

#[test_log::test]
fn part_at_and_part_location_are_inverse() {
    for layer_count in 2..=7 {
        let cube = scrambled(layer_count);
        for x in 0..cube.part_count() {
            assert_eq!(cube.part_location(cube.part_at(x)), x);
            assert_eq!(cube.part_at(cube.part_location(x)), x);
            assert_eq!(
                cube.part_type(cube.part_at(x)),
                cube.part_type(x),
                "parts stay in their category"
            );
        }
    }
}

#[test_log::test]
fn category_accessors_agree_with_global_ones() {
    let cube = scrambled(4);
    let edges = 8;
    let sides = edges + cube.edge_count();

    for corner in 0..8 {
        assert_eq!(cube.corner_location(corner), cube.part_location(corner));
        assert_eq!(Some(cube.corner_orientation(corner)), cube.part_orientation(corner));
        assert_eq!(cube.corner_at(corner), cube.part_at(corner));
    }
    for edge in 0..cube.edge_count() {
        assert_eq!(cube.edge_location(edge) + edges, cube.part_location(edge + edges));
        assert_eq!(Some(cube.edge_orientation(edge)), cube.part_orientation(edge + edges));
    }
    for side in 0..cube.side_count() {
        assert_eq!(cube.side_at(side) + sides, cube.part_at(side + sides));
        assert_eq!(Some(cube.side_orientation(side)), cube.part_orientation(side + sides));
    }
    assert_eq!(cube.part_type(cube.part_count() - 1), PartType::Center);
}

#[test_log::test]
fn unsolved_parts_after_a_turn() {
    let cube = create(3).unwrap();
    cube.transform(Axis::Y, 4, 1).unwrap();
    // four corners, four edges and the up side, which turned in place
    assert_eq!(
        cube.unsolved_parts(),
        vec![0, 2, 4, 6, 8, 11, 14, 17, 21]
    );
}

#[test_log::test]
fn cube_orientation_follows_whole_cube_turns() {
    let cube = create(3).unwrap();
    assert_eq!(cube.cube_orientation(), Some(0));
    assert_eq!(cube.part_orientation(cube.part_count() - 1), Some(0));

    // x
    cube.transform(Axis::X, 7, 1).unwrap();
    assert_eq!(cube.cube_orientation(), Some(1));
    cube.transform(Axis::X, 7, -1).unwrap();

    // y
    cube.transform(Axis::Y, 7, 1).unwrap();
    assert_eq!(cube.cube_orientation(), Some(4));

    assert_eq!(create(2).unwrap().cube_orientation(), None);
}

#[test_log::test]
fn center_faces_follow_every_whole_cube_rotation() {
    for layer_count in 3..=7 {
        let whole = (1u32 << layer_count) - 1;
        let mut seen = HashSet::new();
        let mut pending = vec![create(layer_count).unwrap()];

        while let Some(cube) = pending.pop() {
            let orientation = cube
                .cube_orientation()
                .unwrap_or_else(|| panic!("L={layer_count}: no orientation for {cube:?}"));
            if !seen.insert(orientation) {
                continue;
            }

            // The center shows each face where the sides homed on it went
            let center = cube.part_count() - 1;
            for face in Face::ALL {
                let now = Face::ALL[cube.side_location(face.index()) % 6];
                assert_eq!(
                    cube.part_face(center, face.index()),
                    now,
                    "L={layer_count}, orientation {orientation}, {face:?}"
                );
            }

            for axis in Axis::ALL {
                let next = cube.clone();
                next.transform(axis, whole, 1).unwrap();
                pending.push(next);
            }
        }

        assert_eq!(seen.len(), 24, "L={layer_count}");
    }
}

#[test_log::test]
fn x_then_z_is_a_defined_orientation() {
    let cube = create(3).unwrap();
    cube.transform(Axis::X, 7, 1).unwrap();
    assert_eq!(cube.part_face(26, Face::Right.index()), Face::Right);
    assert_eq!(cube.part_face(26, Face::Front.index()), Face::Up);
    assert_eq!(cube.part_face(26, Face::Down.index()), Face::Front);

    cube.transform(Axis::Z, 7, 1).unwrap();
    assert_eq!(cube.cube_orientation(), Some(18));
    assert_eq!(cube.part_orientation(26), Some(18));
}

#[test_log::test]
fn equality_and_hashing() {
    fn hash(cube: &Cube) -> u64 {
        let mut hasher = DefaultHasher::new();
        cube.hash(&mut hasher);
        hasher.finish()
    }

    let a = scrambled(5);
    let b = create(5).unwrap();
    assert_ne!(a, b);

    b.set_corners(&a.corner_locations(), &a.corner_orientations()).unwrap();
    b.set_edges(&a.edge_locations(), &a.edge_orientations()).unwrap();
    b.set_sides(&a.side_locations(), &a.side_orientations()).unwrap();
    assert_eq!(a, b);
    assert_eq!(hash(&a), hash(&b));

    let copy = a.clone();
    assert_ne!(copy.id(), a.id());
    assert_eq!(copy, a);
    assert_eq!(hash(&copy), hash(&a));

    assert_ne!(create(3).unwrap(), create(4).unwrap());
}

#[test_log::test]
fn setters_validate_their_input() {
    let cube = create(3).unwrap();
    assert_eq!(
        cube.set_corners(&[0, 1, 2], &[0, 0, 0]),
        Err(CubeError::LengthMismatch {
            category: PartType::Corner,
            expected: 8,
            actual: 3
        })
    );
    assert_eq!(
        cube.set_edges(&[0; 12], &[0; 12]),
        Err(CubeError::NotAPermutation {
            category: PartType::Edge,
            count: 12
        })
    );
    assert!(cube.is_solved());

    // orientations are taken modulo their domain
    cube.set_corners(&[0, 1, 2, 3, 4, 5, 6, 7], &[3, 4, 0, 0, 0, 0, 0, 5])
        .unwrap();
    assert_eq!(cube.corner_orientations(), vec![0, 1, 0, 0, 0, 0, 0, 2]);
}

#[test_log::test]
fn transform_by_replays_a_single_turn() {
    let that = create(4).unwrap();
    that.transform(Axis::Z, 2, 1).unwrap();
    that.transform(Axis::Z, 4, 1).unwrap();

    let expected = create(4).unwrap();
    expected.transform(Axis::X, 8, -1).unwrap();
    expected.transform(Axis::Z, 6, 1).unwrap();

    let cube = create(4).unwrap();
    cube.transform(Axis::X, 8, -1).unwrap();
    cube.transform_by(&that).unwrap();
    assert_eq!(cube, expected);
}

#[test_log::test]
fn transform_by_composes_general_states() {
    let turns: Vec<Turn> = ["x:4:1", "y:1:-1", "z:2:2", "x:3:1", "y:4:1"]
        .iter()
        .map(|t| t.parse().unwrap())
        .collect();

    let that = create(3).unwrap();
    for &turn in &turns {
        that.apply(turn).unwrap();
    }

    let expected = create(3).unwrap();
    expected.transform(Axis::Z, 4, 1).unwrap();
    for &turn in &turns {
        expected.apply(turn).unwrap();
    }

    let cube = create(3).unwrap();
    cube.transform(Axis::Z, 4, 1).unwrap();
    cube.transform_by(&that).unwrap();
    assert_eq!(cube, expected);

    // identity leaves the cube alone
    let before = cube.clone();
    cube.transform_by(&create(3).unwrap()).unwrap();
    assert_eq!(cube, before);

    // a cube applied to itself
    let twice = that.clone();
    for &turn in &turns {
        twice.apply(turn).unwrap();
    }
    that.transform_by(&that).unwrap();
    assert_eq!(that, twice);

    assert_eq!(
        cube.transform_by(&create(4).unwrap()),
        Err(CubeError::LayerCountMismatch {
            expected: 3,
            actual: 4
        })
    );
}

#[test_log::test]
fn set_to_copies_the_state() {
    let that = scrambled(6);
    let cube = create(6).unwrap();
    cube.set_to(&that).unwrap();
    assert_eq!(cube, that);

    // the copied history still replays
    let other = create(6).unwrap();
    other.transform_by(&cube).unwrap();
    assert_eq!(other, that);

    assert_eq!(
        cube.set_to(&create(7).unwrap()),
        Err(CubeError::LayerCountMismatch {
            expected: 6,
            actual: 7
        })
    );

    cube.reset();
    assert!(cube.is_solved());
}
