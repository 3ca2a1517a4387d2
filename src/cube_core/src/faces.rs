#![allow(clippy::cast_possible_truncation)]

//! Where the stickers of a part currently point, and which turn a drag over
//! one of them asks for.

use crate::{
    cube::Cube,
    geometry::{Axis, Face, Vec3},
    parts::PartType,
    tables::{self, CORNER_FACES, EDGE_ANGLES, EDGE_AXES, EDGE_FACES},
    turn::Turn,
};

/// A sticker of a part as it currently sits on the cube
struct Sticker {
    category: PartType,
    location: usize,
    /// The cube orientation for the center part, the part orientation
    /// otherwise
    orientation: u8,
    /// The sticker slot of the location the sticker is in
    slot: usize,
}

impl Cube {
    fn sticker(&self, part: usize, sticker: usize) -> Sticker {
        let (category, location, orientation) = self.placement(part);
        let o = orientation as usize;
        let slot = match category {
            PartType::Corner => (sticker % 3 + 3 - o % 3) % 3,
            PartType::Edge => (sticker + o) % 2,
            PartType::Side | PartType::Center => sticker % 6,
        };

        Sticker {
            category,
            location,
            orientation,
            slot,
        }
    }

    fn face_of(sticker: &Sticker) -> Face {
        match sticker.category {
            PartType::Corner => CORNER_FACES[sticker.location][sticker.slot],
            PartType::Edge => EDGE_FACES[sticker.location % 12][sticker.slot],
            PartType::Side => Face::ALL[sticker.location % 6],
            PartType::Center => tables::center_face(sticker.orientation, sticker.slot as u8),
        }
    }

    fn position_of(&self, sticker: &Sticker) -> Vec3 {
        let tables = self.tables();
        match sticker.category {
            PartType::Corner => tables.corner_positions[sticker.location],
            PartType::Edge => tables.edge_positions[sticker.location],
            PartType::Side => tables.side_positions[sticker.location],
            PartType::Center => Vec3::ZERO,
        }
    }

    /// The face that sticker `sticker` of `part` currently shows on. Corners
    /// have three stickers, edges two and sides one; the center part has one
    /// per face.
    ///
    /// # Panics
    ///
    /// Panics if `part` is not below the part count
    pub fn part_face(&self, part: usize, sticker: usize) -> Face {
        Cube::face_of(&self.sticker(part, sticker))
    }

    /// The axis a clockwise turn of the sticker rotates about. Corner and
    /// side stickers turn with their face; edges turn about the cube edge
    /// they lie on. The center part has no axis.
    pub fn part_axis(&self, part: usize, sticker: usize) -> Option<Axis> {
        let sticker = self.sticker(part, sticker);
        match sticker.category {
            PartType::Corner | PartType::Side => Some(Cube::face_of(&sticker).axis()),
            PartType::Edge => Some(EDGE_AXES[sticker.location % 12]),
            PartType::Center => None,
        }
    }

    /// The angle along [`Cube::part_axis`] that is clockwise for the sticker
    pub fn part_angle(&self, part: usize, sticker: usize) -> i8 {
        let sticker = self.sticker(part, sticker);
        match sticker.category {
            PartType::Corner | PartType::Side => {
                if Cube::face_of(&sticker).is_positive() {
                    1
                } else {
                    -1
                }
            }
            PartType::Edge => EDGE_ANGLES[sticker.location % 12][sticker.slot],
            PartType::Center => 0,
        }
    }

    /// The layer turned together with [`Cube::part_axis`] and
    /// [`Cube::part_angle`]
    pub fn part_layer_mask(&self, part: usize, sticker: usize) -> u32 {
        let sticker = self.sticker(part, sticker);
        match sticker.category {
            PartType::Corner | PartType::Side => {
                if Cube::face_of(&sticker).is_positive() {
                    1 << (self.layer_count() - 1)
                } else {
                    1
                }
            }
            PartType::Edge => {
                let axis = EDGE_AXES[sticker.location % 12];
                1 << self.tables().layer_of(self.position_of(&sticker), axis)
            }
            PartType::Center => 0,
        }
    }

    /// The turn that dragging sticker `sticker` of `part` toward `direction`
    /// performs. Directions count clockwise in quarter turns; 0 points at the
    /// first neighbour in the clockwise label order of the sticker's face, or
    /// for sides at the neighbour the part's mark points at. The center part
    /// cannot be dragged.
    pub fn part_swipe(&self, part: usize, sticker: usize, direction: usize) -> Option<Turn> {
        let sticker = self.sticker(part, sticker);
        let label = match sticker.category {
            PartType::Corner | PartType::Edge => direction % 4,
            PartType::Side => (direction % 4 + 4 - sticker.orientation as usize % 4) % 4,
            PartType::Center => return None,
        };

        let face = Cube::face_of(&sticker);
        let position = self.position_of(&sticker);
        let toward = face.labels()[label];

        // The drag turns the layer through the sticker about the axis
        // orthogonal to both the face and the drag
        let axis = face.axis().third(toward.axis());
        let layer = self.tables().layer_of(position, axis);
        let motion = -axis.unit().cross(face.normal());
        let angle = if motion == toward.normal() { 1 } else { -1 };

        Some(Turn::new(axis, 1 << layer, angle))
    }

    pub fn part_swipe_axis(&self, part: usize, sticker: usize, direction: usize) -> Option<Axis> {
        self.part_swipe(part, sticker, direction).map(|turn| turn.axis)
    }

    pub fn part_swipe_layer_mask(&self, part: usize, sticker: usize, direction: usize) -> u32 {
        self.part_swipe(part, sticker, direction)
            .map_or(0, |turn| turn.layer_mask)
    }

    pub fn part_swipe_angle(&self, part: usize, sticker: usize, direction: usize) -> i8 {
        self.part_swipe(part, sticker, direction)
            .map_or(0, |turn| turn.angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create;

    #[test]
    fn solved_faces() {
        let cube = create(3).unwrap();
        // urf
        assert_eq!(cube.part_face(0, 0), Face::Up);
        assert_eq!(cube.part_face(0, 1), Face::Right);
        assert_eq!(cube.part_face(0, 2), Face::Front);
        // the fd edge
        assert_eq!(cube.part_face(8 + 11, 1), Face::Down);
        // the back side
        assert_eq!(cube.part_face(20 + 5, 0), Face::Back);
        // the center shows every face in place
        for face in Face::ALL {
            assert_eq!(cube.part_face(26, face.index()), face);
        }
    }

    #[test]
    fn faces_follow_a_turn() {
        let cube = create(3).unwrap();
        cube.transform(Axis::X, 4, 1).unwrap();

        // R carries the urf corner to ubr with its right sticker still right
        assert_eq!(cube.part_location(0), 2);
        assert_eq!(cube.part_face(0, 0), Face::Back);
        assert_eq!(cube.part_face(0, 1), Face::Right);
        assert_eq!(cube.part_face(0, 2), Face::Up);
    }

    #[test]
    fn axes_and_angles() {
        let cube = create(3).unwrap();
        assert_eq!(cube.part_axis(0, 1), Some(Axis::X));
        assert_eq!(cube.part_angle(0, 1), 1);
        assert_eq!(cube.part_layer_mask(0, 1), 4);
        assert_eq!(cube.part_axis(1, 0), Some(Axis::Y));
        assert_eq!(cube.part_angle(1, 0), -1);
        assert_eq!(cube.part_layer_mask(1, 0), 1);

        // the ur edge turns about z
        assert_eq!(cube.part_axis(8, 0), Some(Axis::Z));
        assert_eq!(cube.part_angle(8, 0), 1);
        assert_eq!(cube.part_angle(8, 1), -1);
        assert_eq!(cube.part_layer_mask(8, 0), 2);

        assert_eq!(cube.part_axis(26, 0), None);
        assert_eq!(cube.part_angle(26, 0), 0);
        assert_eq!(cube.part_layer_mask(26, 0), 0);
    }

    #[test]
    fn swipes_turn_the_layer_under_the_sticker() {
        let cube = create(3).unwrap();

        // dragging the up sticker of urf toward the back turns R
        let swipe = cube.part_swipe(0, 0, 1).unwrap();
        assert_eq!(swipe, Turn::new(Axis::X, 4, 1));
        // and toward the front undoes it
        assert_eq!(cube.part_swipe(0, 0, 3), Some(swipe.inverse()));

        // dragging the front center toward the right turns the middle
        // horizontal slice
        let swipe = cube.part_swipe(20 + 2, 0, 3).unwrap();
        assert_eq!(swipe.axis, Axis::Y);
        assert_eq!(swipe.layer_mask, 2);

        assert_eq!(cube.part_swipe(26, 0, 0), None);
        assert_eq!(cube.part_swipe_layer_mask(26, 0, 0), 0);
    }
}
