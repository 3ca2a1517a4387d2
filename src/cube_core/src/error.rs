use thiserror::Error;

use crate::{Face, PartType};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error("Unsupported layer count, expected a value between 2 and 7 but got {0}")]
    InvalidLayerCount(usize),
    #[error("Layer count mismatch, expected {expected} layers but got {actual}")]
    LayerCountMismatch { expected: usize, actual: usize },
    #[error("Invalid axis, expected a value between 0 and 2 but got {0}")]
    InvalidAxis(usize),
    #[error("Invalid layer mask {layer_mask:#b} for a cube with {layer_count} layers")]
    InvalidLayerMask { layer_mask: u32, layer_count: usize },
    #[error("Invalid angle, expected a value between -2 and 2 but got {0}")]
    InvalidAngle(i8),
    #[error("Invalid {category} array length, expected {expected} entries but got {actual}")]
    LengthMismatch {
        category: PartType,
        expected: usize,
        actual: usize,
    },
    #[error("The {category} locations are not a permutation of 0..{count}")]
    NotAPermutation { category: PartType, count: usize },
    #[error("Invalid turn `{0}`, expected AXIS:MASK:ANGLE such as `y:4:1`")]
    InvalidTurn(String),
}

/// A sticker grid that no cube state can produce
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StickerError {
    #[error("Invalid sticker grid, expected {expected} stickers per face but got {actual}")]
    InvalidGridSize { expected: usize, actual: usize },
    #[error("Invalid corner cube at location {location}")]
    InvalidCorner { location: usize },
    #[error("Invalid edge cube at location {location}")]
    InvalidEdge { location: usize },
    #[error("Duplicate corner cubes at locations {first} and {second}")]
    DuplicateCorner { first: usize, second: usize },
    #[error("Duplicate edge cubes at locations {first} and {second}")]
    DuplicateEdge { first: usize, second: usize },
    #[error("Duplicate side cube at location {location}, no {face} side part is left for it")]
    DuplicateSide { location: usize, face: Face },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StickerParseError {
    #[error("Illegal face `{found}` at line {line}, column {column}")]
    IllegalFace {
        found: char,
        line: usize,
        column: usize,
    },
    #[error("Colon expected but found {found:?} at line {line}, column {column}")]
    ColonExpected {
        found: Option<char>,
        line: usize,
        column: usize,
    },
    #[error("Illegal sticker `{found}` at line {line}, column {column}")]
    IllegalSticker {
        found: char,
        line: usize,
        column: usize,
    },
    #[error("Expected {expected} stickers but line {line} ends at column {column}")]
    TooFewStickers {
        expected: usize,
        line: usize,
        column: usize,
    },
    #[error("Expected the end of line {line} but found `{found}` at column {column}")]
    TrailingCharacter {
        found: char,
        line: usize,
        column: usize,
    },
    #[error("Face {face} is given twice, the second time at line {line}")]
    DuplicateFace { face: Face, line: usize },
    #[error("No stickers given for face {0}")]
    MissingFace(Face),
    #[error("Invalid face letters {0:?}, expected six distinct characters other than `:`")]
    InvalidFaceLetters(String),
}
