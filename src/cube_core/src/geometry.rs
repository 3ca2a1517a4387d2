use std::{
    fmt,
    ops::{Add, Mul, Neg},
};

use crate::error::CubeError;

// Note... X is left to right, Y is down to up, and Z is back to front. The
// coordinate system is right-handed. Cubie coordinates are doubled so that
// even layer counts stay on the integer grid: a cube with L layers spans
// -(L-1)..=(L-1) in steps of two along every axis.

/// One of the three rotation axes of the cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The axis perpendicular to both `self` and `other`, which must differ
    pub(crate) fn third(self, other: Axis) -> Axis {
        Axis::ALL[3 - self.index() - other.index()]
    }

    pub(crate) fn unit(self) -> Vec3 {
        let mut v = [0; 3];
        v[self.index()] = 1;
        Vec3(v)
    }
}

impl TryFrom<usize> for Axis {
    type Error = CubeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Axis::ALL
            .get(value)
            .copied()
            .ok_or(CubeError::InvalidAxis(value))
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// A face of the cube. The discriminants are the face indices used by
/// sticker grids: right, up, front, left, down, back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    Right,
    Up,
    Front,
    Left,
    Down,
    Back,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Right,
        Face::Up,
        Face::Front,
        Face::Left,
        Face::Down,
        Face::Back,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Face> {
        Face::ALL.get(index).copied()
    }

    pub fn axis(self) -> Axis {
        Axis::ALL[self.index() % 3]
    }

    /// Whether the face lies on the positive side of its axis
    pub fn is_positive(self) -> bool {
        self.index() < 3
    }

    pub fn opposite(self) -> Face {
        Face::ALL[(self.index() + 3) % 6]
    }

    pub fn letter(self) -> char {
        ['R', 'U', 'F', 'L', 'D', 'B'][self.index()]
    }

    pub(crate) fn normal(self) -> Vec3 {
        if self.is_positive() {
            self.axis().unit()
        } else {
            -self.axis().unit()
        }
    }

    /// The face this one is carried to by a clockwise quarter turn about the
    /// positive end of `axis`.
    pub(crate) fn turned(self, axis: Axis) -> Face {
        use Face::{Back, Down, Front, Left, Right, Up};

        match (axis, self) {
            (Axis::X, Front) => Up,
            (Axis::X, Up) => Back,
            (Axis::X, Back) => Down,
            (Axis::X, Down) => Front,
            (Axis::Y, Front) => Left,
            (Axis::Y, Left) => Back,
            (Axis::Y, Back) => Right,
            (Axis::Y, Right) => Front,
            (Axis::Z, Up) => Right,
            (Axis::Z, Right) => Down,
            (Axis::Z, Down) => Left,
            (Axis::Z, Left) => Up,
            (_, face) => face,
        }
    }

    /// The four orientation labels of the face, in clockwise order as seen
    /// from outside the cube. Each label is the neighbouring face it points
    /// at; side part orientations and swipe directions count in these labels.
    pub(crate) fn labels(self) -> [Face; 4] {
        use Face::{Back, Down, Front, Left, Right, Up};

        match self {
            Right => [Back, Down, Front, Up],
            Up => [Left, Back, Right, Front],
            Front => [Down, Left, Up, Right],
            Left => [Up, Front, Down, Back],
            Down => [Front, Right, Back, Left],
            Back => [Right, Up, Left, Down],
        }
    }

    pub(crate) fn label_of(self, toward: Face) -> Option<usize> {
        self.labels().iter().position(|&label| label == toward)
    }

    /// The (right, up) directions of the face in the unfolded sticker net
    pub(crate) fn net_axes(self) -> (Face, Face) {
        match self {
            Face::Right => (Face::Back, Face::Up),
            Face::Up => (Face::Right, Face::Back),
            Face::Front => (Face::Right, Face::Up),
            Face::Left => (Face::Front, Face::Up),
            Face::Down => (Face::Right, Face::Front),
            Face::Back => (Face::Left, Face::Up),
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct Vec3(pub [i32; 3]);

impl Vec3 {
    pub(crate) const ZERO: Vec3 = Vec3([0; 3]);

    pub(crate) fn get(self, axis: Axis) -> i32 {
        self.0[axis.index()]
    }

    pub(crate) fn dot(self, other: Vec3) -> i32 {
        self.0.iter().zip(other.0).map(|(a, b)| a * b).sum()
    }

    pub(crate) fn cross(self, other: Vec3) -> Vec3 {
        let [a1, a2, a3] = self.0;
        let [b1, b2, b3] = other.0;
        Vec3([a2 * b3 - a3 * b2, a3 * b1 - a1 * b3, a1 * b2 - a2 * b1])
    }

    /// Clockwise quarter turn about the positive end of `axis`
    pub(crate) fn turned(self, axis: Axis) -> Vec3 {
        let [x, y, z] = self.0;
        Vec3(match axis {
            Axis::X => [x, z, -y],
            Axis::Y => [-z, y, x],
            Axis::Z => [y, -x, z],
        })
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        let [a1, a2, a3] = self.0;
        let [b1, b2, b3] = rhs.0;
        Vec3([a1 + b1, a2 + b2, a3 + b3])
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3(self.0.map(|v| -v))
    }
}

impl Mul<i32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: i32) -> Vec3 {
        Vec3(self.0.map(|v| v * rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turned_faces_agree_with_turned_normals() {
        for axis in Axis::ALL {
            for face in Face::ALL {
                assert_eq!(face.turned(axis).normal(), face.normal().turned(axis));
            }
        }
    }

    #[test]
    fn labels_run_clockwise() {
        for face in Face::ALL {
            let labels = face.labels();
            for i in 0..4 {
                let next = labels[(i + 1) % 4];
                assert_eq!(labels[i].normal().cross(face.normal()), next.normal());
            }
        }
    }

    #[test]
    fn net_axes_form_right_handed_frames() {
        for face in Face::ALL {
            let (right, up) = face.net_axes();
            assert_eq!(right.normal().cross(up.normal()), face.normal());
        }
    }
}
