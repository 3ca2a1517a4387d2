#![warn(clippy::pedantic)]
#![allow(clippy::similar_names, clippy::too_many_lines, clippy::missing_panics_doc)]

//! Permutation engine for the 2x2x2 through 7x7x7 cubes. A [`Cube`] records
//! for every corner, edge and side location which part is there and how it is
//! twisted, applies layer turns, converts to and from sticker grids and tells
//! listeners about every change.

mod cube;
mod error;
mod events;
mod faces;
mod geometry;
mod parts;
mod stickers;
mod tables;
mod turn;

pub use cube::{Cube, CubeId, CubeKind, create};
pub use error::{CubeError, StickerError, StickerParseError};
pub use events::{CubeEvent, CubeListener};
pub use geometry::{Axis, Face};
pub use parts::PartType;
pub use stickers::{FaceLetters, Stickers};
pub use turn::Turn;
