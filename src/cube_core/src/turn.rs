use std::{fmt, str::FromStr};

use crate::{error::CubeError, geometry::Axis};

/// A rotation of the layers selected by `layer_mask` about `axis`. Bit `k` of
/// the mask is the `k`th layer counted from the negative side; `angle` counts
/// clockwise quarter turns seen from the positive face, `±2` being a half turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Turn {
    pub axis: Axis,
    pub layer_mask: u32,
    pub angle: i8,
}

impl Turn {
    pub fn new(axis: Axis, layer_mask: u32, angle: i8) -> Turn {
        Turn {
            axis,
            layer_mask,
            angle,
        }
    }

    /// Whether applying the turn leaves every cube untouched
    pub fn is_noop(self) -> bool {
        self.angle == 0 || self.layer_mask == 0
    }

    #[must_use]
    pub fn inverse(self) -> Turn {
        Turn {
            angle: -self.angle,
            ..self
        }
    }

    /// The selected layers, from the negative side upward
    pub fn layers(self) -> impl Iterator<Item = usize> {
        (0..u32::BITS as usize).filter(move |&k| self.layer_mask >> k & 1 == 1)
    }

    pub(crate) fn validate(self, layer_count: usize) -> Result<(), CubeError> {
        if !(-2..=2).contains(&self.angle) {
            return Err(CubeError::InvalidAngle(self.angle));
        }

        if self.layer_mask >> layer_count != 0 {
            return Err(CubeError::InvalidLayerMask {
                layer_mask: self.layer_mask,
                layer_count,
            });
        }

        Ok(())
    }

    /// The same turn with the angle in `{-1, 1, 2}`, or `None` for a full
    /// rotation
    fn normalized(self) -> Option<Turn> {
        let angle = match self.angle.rem_euclid(4) {
            0 => return None,
            1 => 1,
            2 => 2,
            _ => -1,
        };
        Some(Turn { angle, ..self })
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.axis, self.layer_mask, self.angle)
    }
}

impl FromStr for Turn {
    type Err = CubeError;

    /// Parses `AXIS:MASK:ANGLE` where the axis is `x`, `y`, `z` or its index
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CubeError::InvalidTurn(s.to_owned());

        let mut fields = s.trim().split(':');
        let (Some(axis), Some(layer_mask), Some(angle), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(invalid());
        };

        let axis = match axis.to_ascii_lowercase().as_str() {
            "x" => Axis::X,
            "y" => Axis::Y,
            "z" => Axis::Z,
            index => Axis::try_from(index.parse::<usize>().map_err(|_| invalid())?)?,
        };
        let layer_mask = layer_mask.parse().map_err(|_| invalid())?;
        let angle = angle.parse().map_err(|_| invalid())?;

        Ok(Turn::new(axis, layer_mask, angle))
    }
}

/// What is known about everything that happened to a cube since it was last
/// solved. Kept so that handing one cube's history to another can often be
/// replayed as a single turn instead of a composition of every part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum NetTransform {
    #[default]
    Identity,
    SingleAxis(Turn),
    General,
}

impl NetTransform {
    pub(crate) fn then(self, turn: Turn) -> NetTransform {
        let Some(turn) = turn.normalized().filter(|t| t.layer_mask != 0) else {
            return self;
        };

        match self {
            NetTransform::Identity => NetTransform::SingleAxis(turn),
            NetTransform::SingleAxis(net) if net.axis == turn.axis => {
                if net.layer_mask == turn.layer_mask {
                    Turn::new(net.axis, net.layer_mask, net.angle + turn.angle)
                        .normalized()
                        .map_or(NetTransform::Identity, NetTransform::SingleAxis)
                } else if net.layer_mask & turn.layer_mask == 0 && net.angle == turn.angle {
                    NetTransform::SingleAxis(Turn::new(
                        net.axis,
                        net.layer_mask | turn.layer_mask,
                        net.angle,
                    ))
                } else {
                    NetTransform::General
                }
            }
            NetTransform::SingleAxis(_) | NetTransform::General => NetTransform::General,
        }
    }
}
