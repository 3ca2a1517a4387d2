#![allow(clippy::cast_possible_truncation)]

use std::{fmt, str::FromStr};

use log::debug;
use serde::Deserialize;

use crate::{
    cube::Cube,
    error::{StickerError, StickerParseError},
    events::CubeEvent,
    geometry::Face,
    tables::{CORNER_FACES, CubeTables, EDGE_FACES},
    turn::NetTransform,
};

/// The six characters that name the right, up, front, left, down and back
/// faces in the text sticker format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct FaceLetters([char; 6]);

impl Default for FaceLetters {
    fn default() -> Self {
        FaceLetters(Face::ALL.map(Face::letter))
    }
}

impl FaceLetters {
    /// # Errors
    ///
    /// Fails unless `letters` is six distinct characters, none of them a
    /// colon or a line break
    pub fn new(letters: &str) -> Result<FaceLetters, StickerParseError> {
        let invalid = || StickerParseError::InvalidFaceLetters(letters.to_owned());

        let chars: [char; 6] = letters
            .chars()
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| invalid())?;

        let mut seen = Vec::with_capacity(6);
        for c in chars {
            if c == ':' || c == '\n' || c == '\r' || seen.contains(&c) {
                return Err(invalid());
            }
            seen.push(c);
        }

        Ok(FaceLetters(chars))
    }

    pub fn letter(&self, face: Face) -> char {
        self.0[face.index()]
    }

    pub fn face_of(&self, letter: char) -> Option<Face> {
        self.0
            .iter()
            .position(|&c| c == letter)
            .and_then(Face::from_index)
    }
}

impl TryFrom<String> for FaceLetters {
    type Error = StickerParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FaceLetters::new(&value)
    }
}

impl FromStr for FaceLetters {
    type Err = StickerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FaceLetters::new(s)
    }
}

impl fmt::Display for FaceLetters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// A sticker grid: for every face, the face each of its `L * L` stickers
/// belongs to, row by row from the top of the unfolded net.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stickers {
    layer_count: usize,
    faces: [Vec<Face>; 6],
}

impl Stickers {
    pub fn solved(layer_count: usize) -> Stickers {
        Stickers {
            layer_count,
            faces: Face::ALL.map(|face| vec![face; layer_count * layer_count]),
        }
    }

    /// # Errors
    ///
    /// Fails if a face doesn't have exactly `layer_count²` stickers
    pub fn from_faces(layer_count: usize, faces: [Vec<Face>; 6]) -> Result<Stickers, StickerError> {
        let expected = layer_count * layer_count;
        if let Some(face) = faces.iter().find(|face| face.len() != expected) {
            return Err(StickerError::InvalidGridSize {
                expected,
                actual: face.len(),
            });
        }

        Ok(Stickers { layer_count, faces })
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    pub fn face(&self, face: Face) -> &[Face] {
        &self.faces[face.index()]
    }

    pub fn get(&self, face: Face, index: usize) -> Face {
        self.faces[face.index()][index]
    }

    pub fn set(&mut self, face: Face, index: usize, sticker: Face) {
        self.faces[face.index()][index] = sticker;
    }

    /// Parses one `FACE:STICKERS` line per face. Faces may come in any order
    /// but each exactly once; blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Reports the first offending character with its 1-based line and column
    pub fn parse(
        text: &str,
        layer_count: usize,
        letters: &FaceLetters,
    ) -> Result<Stickers, StickerParseError> {
        let expected = layer_count * layer_count;
        let mut parsed: [Option<Vec<Face>>; 6] = Default::default();

        for (line, text) in text.lines().enumerate() {
            let line = line + 1;
            if text.trim().is_empty() {
                continue;
            }

            let mut chars = text.chars().enumerate().map(|(i, c)| (i + 1, c));
            let end_column = text.chars().count() + 1;

            let Some((column, found)) = chars.next() else {
                continue;
            };
            let face = letters
                .face_of(found)
                .ok_or(StickerParseError::IllegalFace {
                    found,
                    line,
                    column,
                })?;

            match chars.next() {
                Some((_, ':')) => {}
                Some((column, found)) => {
                    return Err(StickerParseError::ColonExpected {
                        found: Some(found),
                        line,
                        column,
                    });
                }
                None => {
                    return Err(StickerParseError::ColonExpected {
                        found: None,
                        line,
                        column: end_column,
                    });
                }
            }

            let mut stickers = Vec::with_capacity(expected);
            for _ in 0..expected {
                let Some((column, found)) = chars.next() else {
                    return Err(StickerParseError::TooFewStickers {
                        expected,
                        line,
                        column: end_column,
                    });
                };
                stickers.push(letters.face_of(found).ok_or(
                    StickerParseError::IllegalSticker {
                        found,
                        line,
                        column,
                    },
                )?);
            }

            if let Some((column, found)) = chars.next() {
                return Err(StickerParseError::TrailingCharacter {
                    found,
                    line,
                    column,
                });
            }

            let slot = &mut parsed[face.index()];
            if slot.is_some() {
                return Err(StickerParseError::DuplicateFace { face, line });
            }
            *slot = Some(stickers);
        }

        let mut faces: [Vec<Face>; 6] = Default::default();
        for face in Face::ALL {
            faces[face.index()] = parsed[face.index()]
                .take()
                .ok_or(StickerParseError::MissingFace(face))?;
        }

        Ok(Stickers { layer_count, faces })
    }

    pub fn to_text(&self, letters: &FaceLetters) -> String {
        let mut text = String::new();
        for face in Face::ALL {
            text.push(letters.letter(face));
            text.push(':');
            text.extend(self.face(face).iter().map(|&s| letters.letter(s)));
            text.push('\n');
        }
        text
    }
}

impl fmt::Display for Stickers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(&FaceLetters::default()))
    }
}

impl Cube {
    /// Reads the face every sticker currently shows on
    pub fn to_stickers(&self) -> Stickers {
        let tables = self.tables();
        let state = self.state();
        let mut stickers = Stickers::solved(self.layer_count());

        for (location, cells) in tables.corner_cells.iter().enumerate() {
            let part = state.corners.part_at(location);
            let o = state.corners.orientation_at(location) as usize;
            for (slot, cell) in cells.iter().enumerate() {
                stickers.set(cell.face, cell.index, CORNER_FACES[part][(slot + o) % 3]);
            }
        }

        for (location, cells) in tables.edge_cells.iter().enumerate() {
            let part = state.edges.part_at(location);
            let o = state.edges.orientation_at(location) as usize;
            for (slot, cell) in cells.iter().enumerate() {
                stickers.set(cell.face, cell.index, EDGE_FACES[part % 12][(slot + o) % 2]);
            }
        }

        for (location, cell) in tables.side_cells.iter().enumerate() {
            let part = state.sides.part_at(location);
            stickers.set(cell.face, cell.index, Face::ALL[part % 6]);
        }

        stickers
    }

    /// Rearranges the parts so that the cube shows `stickers`. Side parts of
    /// the same color are interchangeable on the grid and come back in their
    /// solved orientation, preferring the part that is home.
    ///
    /// # Errors
    ///
    /// Fails without touching the cube if the grid has the wrong size or
    /// no arrangement of parts shows it
    pub fn set_to_stickers(&self, stickers: &Stickers) -> Result<(), StickerError> {
        if stickers.layer_count() != self.layer_count() {
            return Err(StickerError::InvalidGridSize {
                expected: self.layer_count() * self.layer_count(),
                actual: stickers.layer_count() * stickers.layer_count(),
            });
        }

        let tables = self.tables();
        let corners = import_corners(tables, stickers)?;
        let edges = import_edges(tables, stickers)?;
        let sides = import_sides(tables, stickers)?;

        {
            let mut state = self.state();
            state.corners.replace(&corners.0, &corners.1);
            state.edges.replace(&edges.0, &edges.1);
            state.sides.replace(&sides.0, &sides.1);
            state.net = NetTransform::General;
        }

        debug!("Imported stickers into {}", self.id());
        self.fire(CubeEvent::changed(self.id()));

        Ok(())
    }
}

/// Records `part` as placed at `location`, or returns where it already is
fn claim(owners: &mut [Option<usize>], part: usize, location: usize) -> Result<(), usize> {
    match owners[part] {
        Some(first) => Err(first),
        None => {
            owners[part] = Some(location);
            Ok(())
        }
    }
}

fn import_corners(
    tables: &CubeTables,
    stickers: &Stickers,
) -> Result<(Vec<usize>, Vec<u8>), StickerError> {
    let mut locations = vec![0; 8];
    let mut orientations = vec![0; 8];
    let mut owners = [None; 8];

    for (location, cells) in tables.corner_cells.iter().enumerate() {
        let colors = cells.map(|cell| stickers.get(cell.face, cell.index));

        let (part, o) = (0..8)
            .flat_map(|part| (0..3).map(move |o| (part, o)))
            .find(|&(part, o)| (0..3).all(|s| CORNER_FACES[part][(s + o) % 3] == colors[s]))
            .ok_or(StickerError::InvalidCorner { location })?;

        claim(&mut owners, part, location)
            .map_err(|first| StickerError::DuplicateCorner {
                first,
                second: location,
            })?;
        locations[location] = part;
        orientations[location] = o as u8;
    }

    Ok((locations, orientations))
}

fn import_edges(
    tables: &CubeTables,
    stickers: &Stickers,
) -> Result<(Vec<usize>, Vec<u8>), StickerError> {
    let count = tables.edge_count();
    let mut locations = vec![0; count];
    let mut orientations = vec![0; count];
    let mut owners = vec![None; count];

    for (location, cells) in tables.edge_cells.iter().enumerate() {
        let colors = cells.map(|cell| stickers.get(cell.face, cell.index));

        let (base, o) = (0..12)
            .flat_map(|base| (0..2).map(move |o| (base, o)))
            .find(|&(base, o)| (0..2).all(|s| EDGE_FACES[base][(s + o) % 2] == colors[s]))
            .ok_or(StickerError::InvalidEdge { location })?;

        // Wings with the same colors differ in their distance from the middle
        // of the cube edge and in their handedness
        let offset = tables.edge_offsets[location].abs();
        let handedness = tables.edge_handedness(location, o);
        let part = (base..count)
            .step_by(12)
            .find(|&part| {
                tables.edge_offsets[part].abs() == offset
                    && tables.edge_handedness(part, 0) == handedness
            })
            .ok_or(StickerError::InvalidEdge { location })?;

        claim(&mut owners, part, location).map_err(|first| StickerError::DuplicateEdge {
            first,
            second: location,
        })?;
        locations[location] = part;
        orientations[location] = o as u8;
    }

    Ok((locations, orientations))
}

fn import_sides(
    tables: &CubeTables,
    stickers: &Stickers,
) -> Result<(Vec<usize>, Vec<u8>), StickerError> {
    let count = tables.side_count();
    let colors = tables
        .side_cells
        .iter()
        .map(|cell| stickers.get(cell.face, cell.index))
        .collect::<Vec<_>>();

    let mut locations = vec![None; count];
    let mut used = vec![false; count];

    // Parts that can stay home do
    for location in 0..count {
        if colors[location] == Face::ALL[location % 6] {
            locations[location] = Some(location);
            used[location] = true;
        }
    }

    for location in 0..count {
        if locations[location].is_some() {
            continue;
        }

        let color = colors[location];
        let part = (0..count)
            .find(|&part| {
                !used[part]
                    && part % 6 == color.index()
                    && tables.side_orbits[part] == tables.side_orbits[location]
            })
            .ok_or(StickerError::DuplicateSide {
                location,
                face: color,
            })?;

        locations[location] = Some(part);
        used[part] = true;
    }

    Ok((locations.into_iter().flatten().collect(), vec![0; count]))
}
