#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

//! Constant tables of each cube variant. The corner, edge and center tables
//! below are fixed; the per-layer twist cycles, sticker cells and part
//! positions depend on the layer count and are derived from cubie geometry
//! the first time a variant is used.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::OnceLock,
};

use itertools::Itertools;
use log::debug;

use crate::{
    geometry::{Axis, Face, Vec3},
    parts::{FourCycle, Spin},
};

pub(crate) const MIN_LAYERS: usize = 2;
pub(crate) const MAX_LAYERS: usize = 7;

/// The faces of the three sticker slots of each corner location:
/// urf, dfr, ubr, drb, ulb, dbl, ufl, dlf.
pub(crate) const CORNER_FACES: [[Face; 3]; 8] = {
    use Face::{Back, Down, Front, Left, Right, Up};
    [
        [Up, Right, Front],
        [Down, Front, Right],
        [Up, Back, Right],
        [Down, Right, Back],
        [Up, Left, Back],
        [Down, Back, Left],
        [Up, Front, Left],
        [Down, Left, Front],
    ]
};

/// The faces of the two sticker slots of each base edge:
/// ur, rf, dr, bu, rb, bd, ul, lb, dl, fu, lf, fd.
pub(crate) const EDGE_FACES: [[Face; 2]; 12] = {
    use Face::{Back, Down, Front, Left, Right, Up};
    [
        [Up, Right],
        [Right, Front],
        [Down, Right],
        [Back, Up],
        [Right, Back],
        [Back, Down],
        [Up, Left],
        [Left, Back],
        [Down, Left],
        [Front, Up],
        [Left, Front],
        [Front, Down],
    ]
};

/// The axis each base edge runs along
pub(crate) const EDGE_AXES: [Axis; 12] = {
    use Axis::{X, Y, Z};
    [Z, Y, Z, X, Y, X, Z, Y, Z, X, Y, X]
};

/// The clockwise angle of each sticker slot of each base edge; the angle
/// that carries the sticker toward the other face of the edge.
pub(crate) const EDGE_ANGLES: [[i8; 2]; 12] = [
    [1, -1],
    [1, -1],
    [-1, 1],
    [-1, 1],
    [-1, 1],
    [1, -1],
    [-1, 1],
    [1, -1],
    [1, -1],
    [1, -1],
    [-1, 1],
    [-1, 1],
];

/// The 24 cube orientations, keyed by the home faces of the side parts found
/// at the front and right reference locations.
const ORIENTATION_KEYS: [[usize; 2]; 24] = [
    [2, 0], // front at front, right at right
    [4, 0], // x
    [5, 0], // x2
    [1, 0], // x'
    [0, 5], // y
    [5, 3], // y2
    [3, 2], // y'
    [2, 1], // z
    [2, 3], // z2
    [2, 4], // z'
    [0, 1], // x y
    [1, 3], // x y2
    [3, 4], // x y'
    [0, 2], // x2 y
    [3, 5], // x2 y'
    [0, 4], // x' y
    [4, 3], // x' y2
    [3, 1], // x' y'
    [4, 2], // x z
    [4, 5], // x z'
    [5, 4], // x2 z
    [5, 1], // x2 z'
    [1, 5], // x' z
    [1, 2], // x' z'
];

pub(crate) fn cube_orientation(front: Face, right: Face) -> Option<u8> {
    ORIENTATION_KEYS
        .iter()
        .position(|&key| key == [front.index(), right.index()])
        .map(|o| o as u8)
}

/// For a cube orientation, the face on which each of the six faces of the
/// center part currently shows
fn center_faces(cube_orientation: u8) -> [Face; 6] {
    let [front, right] = ORIENTATION_KEYS[cube_orientation as usize].map(|f| Face::ALL[f]);
    // The rotation carries `front` to the front and `right` to the right, so
    // it carries their cross product to the top
    let up_normal = front.normal().cross(right.normal());
    let up = Face::ALL
        .into_iter()
        .find(|face| face.normal() == up_normal)
        .expect("the keys pair faces on different axes");

    let mut faces = Face::ALL;
    for (home, now) in [(front, Face::Front), (right, Face::Right), (up, Face::Up)] {
        faces[home.index()] = now;
        faces[home.opposite().index()] = now.opposite();
    }
    faces
}

pub(crate) fn center_face(cube_orientation: u8, orientation: u8) -> Face {
    center_faces(cube_orientation)[orientation as usize % 6]
}

/// A sticker position in a sticker grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Cell {
    pub face: Face,
    pub index: usize,
}

/// Everything a clockwise quarter turn of one layer does
#[derive(Debug, Default)]
pub(crate) struct LayerTwist {
    pub corners: Vec<FourCycle>,
    pub edges: Vec<FourCycle>,
    pub sides: Vec<FourCycle>,
    pub side_spins: Vec<Spin>,
}

impl LayerTwist {
    pub(crate) fn corner_locations(&self) -> impl Iterator<Item = usize> + '_ {
        self.corners.iter().flat_map(|cycle| cycle.locations)
    }

    pub(crate) fn edge_locations(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().flat_map(|cycle| cycle.locations)
    }

    pub(crate) fn side_locations(&self) -> impl Iterator<Item = usize> + '_ {
        self.sides
            .iter()
            .flat_map(|cycle| cycle.locations)
            .chain(self.side_spins.iter().map(|spin| spin.location))
    }
}

#[derive(Debug)]
pub(crate) struct CubeTables {
    pub layer_count: usize,
    pub corner_positions: [Vec3; 8],
    pub edge_positions: Vec<Vec3>,
    /// Offset of each edge location along its edge axis
    pub edge_offsets: Vec<i32>,
    pub side_positions: Vec<Vec3>,
    /// Parts can only ever move between side locations of the same orbit
    pub side_orbits: Vec<usize>,
    pub corner_cells: [[Cell; 3]; 8],
    pub edge_cells: Vec<[Cell; 2]>,
    pub side_cells: Vec<Cell>,
    twists: Vec<LayerTwist>,
}

static TABLES: [OnceLock<CubeTables>; MAX_LAYERS - MIN_LAYERS + 1] =
    [const { OnceLock::new() }; MAX_LAYERS - MIN_LAYERS + 1];

/// Get the tables of the variant with `layer_count` layers
///
/// # Panics
///
/// Panics if `layer_count` is outside `MIN_LAYERS..=MAX_LAYERS`. The factory
/// rejects those counts before any cube exists.
pub(crate) fn tables(layer_count: usize) -> &'static CubeTables {
    TABLES[layer_count - MIN_LAYERS].get_or_init(|| CubeTables::new(layer_count))
}

impl CubeTables {
    fn new(layer_count: usize) -> CubeTables {
        let extent = layer_count as i32 - 1;
        let inner = layer_count - 2;

        let corner_positions = CORNER_FACES.map(|faces| {
            faces
                .iter()
                .fold(Vec3::ZERO, |acc, face| acc + face.normal() * extent)
        });

        let edge_offsets = (0..12 * inner)
            .map(|e| edge_offset(e / 12, layer_count))
            .collect_vec();
        let edge_positions = edge_offsets
            .iter()
            .enumerate()
            .map(|(e, &offset)| {
                let [f0, f1] = EDGE_FACES[e % 12];
                (f0.normal() + f1.normal()) * extent + EDGE_AXES[e % 12].unit() * offset
            })
            .collect_vec();

        let (face_offsets, face_orbits) = face_layout(layer_count);
        let side_count = 6 * face_offsets.len();
        let side_positions = (0..side_count)
            .map(|s| {
                let (u, v) = face_offsets[s / 6];
                side_position(Face::ALL[s % 6], u, v, extent)
            })
            .collect_vec();
        let side_orbits = (0..side_count).map(|s| face_orbits[s / 6]).collect();

        let corner_cells = std::array::from_fn(|c| {
            CORNER_FACES[c].map(|face| cell(face, corner_positions[c], layer_count))
        });
        let edge_cells = edge_positions
            .iter()
            .enumerate()
            .map(|(e, &p)| EDGE_FACES[e % 12].map(|face| cell(face, p, layer_count)))
            .collect();
        let side_cells = side_positions
            .iter()
            .enumerate()
            .map(|(s, &p)| cell(Face::ALL[s % 6], p, layer_count))
            .collect();

        let mut tables = CubeTables {
            layer_count,
            corner_positions,
            edge_positions,
            edge_offsets,
            side_positions,
            side_orbits,
            corner_cells,
            edge_cells,
            side_cells,
            twists: Vec::new(),
        };

        let twists = Axis::ALL
            .into_iter()
            .cartesian_product(0..layer_count)
            .map(|(axis, layer)| tables.derive_twist(axis, layer))
            .collect();
        tables.twists = twists;

        debug!(
            "Derived tables for {layer_count} layers: {} edges, {side_count} sides",
            tables.edge_positions.len()
        );

        tables
    }

    pub(crate) fn extent(&self) -> i32 {
        self.layer_count as i32 - 1
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edge_positions.len()
    }

    pub(crate) fn side_count(&self) -> usize {
        self.side_positions.len()
    }

    pub(crate) fn twist(&self, axis: Axis, layer: usize) -> &LayerTwist {
        &self.twists[axis.index() * self.layer_count + layer]
    }

    /// The layer along `axis` that contains `position`
    pub(crate) fn layer_of(&self, position: Vec3, axis: Axis) -> usize {
        ((position.get(axis) + self.extent()) / 2) as usize
    }

    /// The sign of the triple product of the edge's first sticker, its second
    /// sticker and its offset from the middle of the cube edge. Turns never
    /// change it, so it tells the two mirror-image wings of a pair apart. The
    /// middle edge of an odd cube has none.
    pub(crate) fn edge_handedness(&self, location: usize, first_slot: usize) -> i32 {
        let faces = EDGE_FACES[location % 12];
        let offset = EDGE_AXES[location % 12].unit() * self.edge_offsets[location];
        faces[first_slot]
            .normal()
            .cross(faces[1 - first_slot].normal())
            .dot(offset)
            .signum()
    }

    fn derive_twist(&self, axis: Axis, layer: usize) -> LayerTwist {
        let coordinate = 2 * layer as i32 - self.extent();

        let corner_index = index_by_position(&self.corner_positions);
        let (corners, _) = collect_cycles(
            self.corner_positions
                .iter()
                .enumerate()
                .filter(|(_, p)| p.get(axis) == coordinate)
                .map(|(from, p)| {
                    let to = corner_index[&p.turned(axis)];
                    let slot = slot_of(&CORNER_FACES[to], CORNER_FACES[from][0].turned(axis));
                    (to, from, ((3 - slot) % 3) as u8)
                }),
        );

        let edge_index = index_by_position(&self.edge_positions);
        let (edges, _) = collect_cycles(
            self.edge_positions
                .iter()
                .enumerate()
                .filter(|(_, p)| p.get(axis) == coordinate)
                .map(|(from, p)| {
                    let to = edge_index[&p.turned(axis)];
                    let slot = slot_of(&EDGE_FACES[to % 12], EDGE_FACES[from % 12][0].turned(axis));
                    (to, from, slot as u8)
                }),
        );

        let side_index = index_by_position(&self.side_positions);
        let (sides, side_spins) = collect_cycles(
            self.side_positions
                .iter()
                .enumerate()
                .filter(|(_, p)| p.get(axis) == coordinate)
                .map(|(from, p)| {
                    let to = side_index[&p.turned(axis)];
                    let mark = Face::ALL[from % 6].labels()[0].turned(axis);
                    let label = Face::ALL[to % 6]
                        .label_of(mark)
                        .expect("a turned side keeps its mark on the face plane");
                    (to, from, ((4 - label) % 4) as u8)
                }),
        );

        LayerTwist {
            corners,
            edges,
            sides,
            side_spins,
        }
    }
}

fn index_by_position(positions: &[Vec3]) -> HashMap<Vec3, usize> {
    positions.iter().enumerate().map(|(i, &p)| (p, i)).collect()
}

fn slot_of(faces: &[Face], face: Face) -> usize {
    faces
        .iter()
        .position(|&f| f == face)
        .expect("a turned cubie keeps its faces on the cubie it lands on")
}

/// Groups moves given as `(to, from, delta)` into four cycles and in-place
/// spins.
fn collect_cycles(
    moves: impl IntoIterator<Item = (usize, usize, u8)>,
) -> (Vec<FourCycle>, Vec<Spin>) {
    let sources: BTreeMap<usize, (usize, u8)> = moves
        .into_iter()
        .map(|(to, from, delta)| (to, (from, delta)))
        .collect();

    let mut seen = BTreeSet::new();
    let mut cycles = Vec::new();
    let mut spins = Vec::new();

    for (&start, &(from, delta)) in &sources {
        if seen.contains(&start) {
            continue;
        }

        if from == start {
            seen.insert(start);
            spins.push(Spin {
                location: start,
                delta,
            });
            continue;
        }

        let mut locations = [start; 4];
        let mut deltas = [delta; 4];
        for i in 1..4 {
            let (next, _) = sources[&locations[i - 1]];
            locations[i] = next;
            deltas[i] = sources[&next].1;
        }
        debug_assert_eq!(sources[&locations[3]].0, start);

        seen.extend(locations);
        cycles.push(FourCycle { locations, deltas });
    }

    (cycles, spins)
}

/// Offset along the edge axis of the edges in `group`. Odd cubes start with
/// the middle edge, then both cubes alternate between the negative and the
/// positive side, moving outward.
fn edge_offset(group: usize, layer_count: usize) -> i32 {
    let g = group as i32;
    if layer_count % 2 == 1 {
        if g == 0 {
            return 0;
        }
        let distance = 2 * ((g + 1) / 2);
        if g % 2 == 1 { -distance } else { distance }
    } else {
        let distance = 2 * (g / 2) + 1;
        if g % 2 == 0 { -distance } else { distance }
    }
}

/// Face-local (right, up) offsets of the side locations of one face, and the
/// orbit each belongs to. The center comes first on odd cubes, then rings
/// from the inside out. Every ring lists its corner orbit, its middle orbit
/// and then its remaining bottom row orbits from left to right, each as four
/// clockwise members.
fn face_layout(layer_count: usize) -> (Vec<(i32, i32)>, Vec<usize>) {
    let odd = layer_count % 2 == 1;
    let max_ring = layer_count as i32 - 3;

    let mut offsets = Vec::new();
    let mut orbits = Vec::new();
    if odd {
        offsets.push((0, 0));
        orbits.push(0);
    }

    let first_ring = if odd { 2 } else { 1 };
    let mut orbit = orbits.len();
    for ring in (first_ring..=max_ring).step_by(2) {
        let mut representatives = vec![(-ring, -ring)];
        if odd {
            representatives.push((0, -ring));
        }
        representatives.extend(
            ((2 - ring)..=(ring - 2))
                .step_by(2)
                .filter(|&u| u != 0)
                .map(|u| (u, -ring)),
        );

        for mut p in representatives {
            for _ in 0..4 {
                offsets.push(p);
                orbits.push(orbit);
                p = (p.1, -p.0);
            }
            orbit += 1;
        }
    }

    (offsets, orbits)
}

fn side_position(face: Face, u: i32, v: i32, extent: i32) -> Vec3 {
    let mark = face.labels()[0].normal();
    let right = face.normal().cross(mark);
    let up = -mark;
    face.normal() * extent + right * u + up * v
}

fn cell(face: Face, position: Vec3, layer_count: usize) -> Cell {
    let extent = layer_count as i32 - 1;
    let (right, up) = face.net_axes();
    let column = (position.dot(right.normal()) + extent) / 2;
    let row = (extent - position.dot(up.normal())) / 2;
    Cell {
        face,
        index: row as usize * layer_count + column as usize,
    }
}
