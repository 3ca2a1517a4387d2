use std::fmt;

use crate::error::CubeError;

/// The four disjoint categories of parts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartType {
    Corner,
    Edge,
    Side,
    Center,
}

impl PartType {
    /// Number of distinct orientations a part of this category can take
    pub fn orientation_count(self) -> u8 {
        match self {
            PartType::Corner => 3,
            PartType::Edge => 2,
            PartType::Side => 4,
            PartType::Center => 24,
        }
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PartType::Corner => "corner",
            PartType::Edge => "edge",
            PartType::Side => "side",
            PartType::Center => "center",
        })
    }
}

/// A four cycle of locations. The part at `locations[i + 1]` moves to
/// `locations[i]` and gains `deltas[i]` orientation steps, indices taken
/// modulo four.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FourCycle {
    pub locations: [usize; 4],
    pub deltas: [u8; 4],
}

impl FourCycle {
    /// The cycle that undoes this one
    pub(crate) fn inverse(self, modulus: u8) -> FourCycle {
        let [l1, l2, l3, l4] = self.locations;
        let [d1, d2, d3, d4] = self.deltas.map(|d| (modulus - d % modulus) % modulus);
        FourCycle {
            locations: [l4, l3, l2, l1],
            deltas: [d3, d2, d1, d4],
        }
    }
}

/// A part that turns in place, such as the center side of a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Spin {
    pub location: usize,
    pub delta: u8,
}

/// The location and orientation arrays of one part category.
/// `locations[l]` is the part occupying location `l` and `orientations[l]`
/// is that part's orientation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PartSet {
    locations: Vec<usize>,
    orientations: Vec<u8>,
    modulus: u8,
}

impl PartSet {
    pub(crate) fn solved(count: usize, category: PartType) -> PartSet {
        PartSet {
            locations: (0..count).collect(),
            orientations: vec![0; count],
            modulus: category.orientation_count(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.locations.len()
    }

    pub(crate) fn reset(&mut self) {
        for (i, (loc, orient)) in self
            .locations
            .iter_mut()
            .zip(&mut self.orientations)
            .enumerate()
        {
            *loc = i;
            *orient = 0;
        }
    }

    pub(crate) fn is_solved(&self) -> bool {
        self.unsolved().next().is_none()
    }

    /// Parts that are away from home or twisted
    pub(crate) fn unsolved(&self) -> impl Iterator<Item = usize> + '_ {
        // The displaced locations and the displaced parts are the same set
        (0..self.len()).filter(|&l| self.locations[l] != l || self.orientations[l] != 0)
    }

    pub(crate) fn part_at(&self, location: usize) -> usize {
        self.locations[location]
    }

    /// # Panics
    ///
    /// Panics if `part` is not a part of this category
    pub(crate) fn location_of(&self, part: usize) -> usize {
        if self.locations.get(part) == Some(&part) {
            return part;
        }

        self.locations
            .iter()
            .position(|&p| p == part)
            .unwrap_or_else(|| panic!("part {part} is out of range for {} parts", self.len()))
    }

    pub(crate) fn orientation_at(&self, location: usize) -> u8 {
        self.orientations[location]
    }

    pub(crate) fn locations(&self) -> Vec<usize> {
        self.locations.clone()
    }

    pub(crate) fn orientations(&self) -> Vec<u8> {
        self.orientations.clone()
    }

    /// Checks a replacement for this category without applying it
    pub(crate) fn validate(
        &self,
        category: PartType,
        locations: &[usize],
        orientations: &[u8],
    ) -> Result<(), CubeError> {
        for actual in [locations.len(), orientations.len()] {
            if actual != self.len() {
                return Err(CubeError::LengthMismatch {
                    category,
                    expected: self.len(),
                    actual,
                });
            }
        }

        let mut covered = vec![false; self.len()];
        for &part in locations {
            match covered.get_mut(part) {
                Some(seen) if !*seen => *seen = true,
                _ => {
                    return Err(CubeError::NotAPermutation {
                        category,
                        count: self.len(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Overwrites both arrays. Callers validate first.
    pub(crate) fn replace(&mut self, locations: &[usize], orientations: &[u8]) {
        self.locations.copy_from_slice(locations);
        for (dst, &src) in self.orientations.iter_mut().zip(orientations) {
            *dst = src % self.modulus;
        }
    }

    pub(crate) fn copy_from(&mut self, other: &PartSet) {
        self.locations.copy_from_slice(&other.locations);
        self.orientations.copy_from_slice(&other.orientations);
    }

    fn add(&self, orient: u8, delta: u8) -> u8 {
        (orient + delta) % self.modulus
    }

    pub(crate) fn four_cycle(&mut self, cycle: &FourCycle) {
        let [l1, l2, l3, l4] = cycle.locations;
        let [o1, o2, o3, o4] = cycle.deltas;

        let swap = self.locations[l1];
        self.locations[l1] = self.locations[l2];
        self.locations[l2] = self.locations[l3];
        self.locations[l3] = self.locations[l4];
        self.locations[l4] = swap;

        let swap = self.orientations[l1];
        self.orientations[l1] = self.add(self.orientations[l2], o1);
        self.orientations[l2] = self.add(self.orientations[l3], o2);
        self.orientations[l3] = self.add(self.orientations[l4], o3);
        self.orientations[l4] = self.add(swap, o4);
    }

    pub(crate) fn two_cycle(&mut self, l1: usize, l2: usize, o1: u8, o2: u8) {
        self.locations.swap(l1, l2);

        let swap = self.orientations[l1];
        self.orientations[l1] = self.add(self.orientations[l2], o1);
        self.orientations[l2] = self.add(swap, o2);
    }

    fn spin(&mut self, location: usize, delta: u8) {
        self.orientations[location] = self.add(self.orientations[location], delta);
    }

    /// Applies a quarter (`angle` of ±1) or half (±2) turn made of `cycles`
    /// and `spins`. Other angles are ignored.
    pub(crate) fn turn(&mut self, cycles: &[FourCycle], spins: &[Spin], angle: i8) {
        let m = self.modulus;
        match angle {
            1 => {
                for cycle in cycles {
                    self.four_cycle(cycle);
                }
                for spin in spins {
                    self.spin(spin.location, spin.delta);
                }
            }
            -1 => {
                for cycle in cycles {
                    self.four_cycle(&cycle.inverse(m));
                }
                for spin in spins {
                    self.spin(spin.location, (m - spin.delta % m) % m);
                }
            }
            2 | -2 => {
                for cycle in cycles {
                    let [l1, l2, l3, l4] = cycle.locations;
                    let [d1, d2, d3, d4] = cycle.deltas;
                    self.two_cycle(l1, l3, d1 + d2, d3 + d4);
                    self.two_cycle(l2, l4, d2 + d3, d4 + d1);
                }
                for spin in spins {
                    self.spin(spin.location, 2 * spin.delta);
                }
            }
            _ => {}
        }
    }

    /// Applies the permutation recorded in `that`, which must be of the same
    /// size, on top of this one.
    pub(crate) fn compose(&mut self, that: &PartSet) {
        let old_locations = self.locations.clone();
        let old_orientations = self.orientations.clone();

        for (i, (&from, &delta)) in that.locations.iter().zip(&that.orientations).enumerate() {
            self.locations[i] = old_locations[from];
            self.orientations[i] = self.add(old_orientations[from], delta);
        }
    }
}
