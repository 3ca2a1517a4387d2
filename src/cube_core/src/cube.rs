use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use log::{debug, trace};
use parking_lot::{Mutex, MutexGuard};

use crate::{
    error::CubeError,
    events::{CubeEvent, CubeListener, Listeners},
    geometry::{Axis, Face},
    parts::{PartSet, PartType},
    tables::{self, CubeTables},
    turn::{NetTransform, Turn},
};

/// Identity of a cube, assigned in creation order. Operations that lock two
/// cubes take the locks in ascending id order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeId(u64);

impl CubeId {
    fn next() -> CubeId {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        CubeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CubeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cube#{}", self.0)
    }
}

/// The supported cube variants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeKind {
    Pocket,
    Rubiks,
    Revenge,
    Professor,
    Cube6,
    Cube7,
}

impl CubeKind {
    pub const ALL: [CubeKind; 6] = [
        CubeKind::Pocket,
        CubeKind::Rubiks,
        CubeKind::Revenge,
        CubeKind::Professor,
        CubeKind::Cube6,
        CubeKind::Cube7,
    ];

    pub fn layer_count(self) -> usize {
        self as usize + tables::MIN_LAYERS
    }

    /// # Errors
    ///
    /// Fails for layer counts outside `2..=7`
    pub fn from_layer_count(layer_count: usize) -> Result<CubeKind, CubeError> {
        layer_count
            .checked_sub(tables::MIN_LAYERS)
            .and_then(|i| CubeKind::ALL.get(i))
            .copied()
            .ok_or(CubeError::InvalidLayerCount(layer_count))
    }

    pub fn name(self) -> &'static str {
        match self {
            CubeKind::Pocket => "Pocket Cube",
            CubeKind::Rubiks => "Rubik's Cube",
            CubeKind::Revenge => "Rubik's Revenge",
            CubeKind::Professor => "Professor's Cube",
            CubeKind::Cube6 => "V-Cube 6",
            CubeKind::Cube7 => "V-Cube 7",
        }
    }
}

impl fmt::Display for CubeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Creates a solved cube with `layer_count` layers
///
/// # Errors
///
/// Fails for layer counts outside `2..=7`
pub fn create(layer_count: usize) -> Result<Cube, CubeError> {
    CubeKind::from_layer_count(layer_count).map(Cube::new)
}

#[derive(Clone, Debug)]
pub(crate) struct CubeState {
    pub corners: PartSet,
    pub edges: PartSet,
    pub sides: PartSet,
    pub net: NetTransform,
}

/// What `transform_by` did, to be reported once the locks are released
enum Merge {
    Nothing,
    Replayed(Turn, Vec<usize>),
    Composed,
}

impl CubeState {
    fn solved(tables: &CubeTables) -> CubeState {
        CubeState {
            corners: PartSet::solved(8, PartType::Corner),
            edges: PartSet::solved(tables.edge_count(), PartType::Edge),
            sides: PartSet::solved(tables.side_count(), PartType::Side),
            net: NetTransform::Identity,
        }
    }

    pub(crate) fn part_set(&self, category: PartType) -> &PartSet {
        match category {
            PartType::Corner => &self.corners,
            PartType::Edge => &self.edges,
            PartType::Side | PartType::Center => &self.sides,
        }
    }

    fn part_set_mut(&mut self, category: PartType) -> &mut PartSet {
        match category {
            PartType::Corner => &mut self.corners,
            PartType::Edge => &mut self.edges,
            PartType::Side | PartType::Center => &mut self.sides,
        }
    }

    fn reset(&mut self) {
        self.corners.reset();
        self.edges.reset();
        self.sides.reset();
        self.net = NetTransform::Identity;
    }

    fn is_solved(&self) -> bool {
        self.corners.is_solved() && self.edges.is_solved() && self.sides.is_solved()
    }

    /// Read off the home faces of the side parts at the front and right
    /// reference locations. A pocket cube has no side parts.
    pub(crate) fn cube_orientation(&self) -> Option<u8> {
        if self.sides.len() == 0 {
            return None;
        }

        let front = Face::ALL[self.sides.part_at(Face::Front.index()) % 6];
        let right = Face::ALL[self.sides.part_at(Face::Right.index()) % 6];
        tables::cube_orientation(front, right)
    }

    /// Applies a validated turn and returns the affected global locations
    fn turn(&mut self, tables: &CubeTables, turn: Turn) -> Vec<usize> {
        let orientation_before = self.cube_orientation();
        self.net = self.net.then(turn);

        let edge_offset = 8;
        let side_offset = edge_offset + tables.edge_count();

        let mut affected = Vec::new();
        for layer in turn.layers() {
            let twist = tables.twist(turn.axis, layer);
            self.corners.turn(&twist.corners, &[], turn.angle);
            self.edges.turn(&twist.edges, &[], turn.angle);
            self.sides
                .turn(&twist.sides, &twist.side_spins, turn.angle);

            affected.extend(twist.corner_locations());
            affected.extend(twist.edge_locations().map(|l| l + edge_offset));
            affected.extend(twist.side_locations().map(|l| l + side_offset));
        }

        if self.cube_orientation() != orientation_before {
            affected.push(side_offset + tables.side_count());
        }

        affected.sort_unstable();
        affected.dedup();
        affected
    }

    /// Applies the net transform of `that`. A single-axis net is replayed as
    /// one turn, anything else is composed array by array.
    fn merge(&mut self, tables: &CubeTables, that: &CubeState) -> Merge {
        match that.net {
            NetTransform::Identity => Merge::Nothing,
            NetTransform::SingleAxis(turn) => Merge::Replayed(turn, self.turn(tables, turn)),
            NetTransform::General => {
                self.corners.compose(&that.corners);
                self.edges.compose(&that.edges);
                self.sides.compose(&that.sides);
                self.net = NetTransform::General;
                Merge::Composed
            }
        }
    }

    fn copy_from(&mut self, that: &CubeState) {
        self.corners.copy_from(&that.corners);
        self.edges.copy_from(&that.edges);
        self.sides.copy_from(&that.sides);
        self.net = that.net;
    }

    fn same_parts(&self, that: &CubeState) -> bool {
        self.corners == that.corners && self.edges == that.edges && self.sides == that.sides
    }
}

/// A cube of any supported layer count. All methods take `&self`; the state
/// sits behind a lock so that a cube can be shared between threads.
pub struct Cube {
    id: CubeId,
    tables: &'static CubeTables,
    state: Mutex<CubeState>,
    quiet: AtomicBool,
    listeners: Listeners,
}

impl Cube {
    pub fn new(kind: CubeKind) -> Cube {
        let tables = tables::tables(kind.layer_count());
        let cube = Cube {
            id: CubeId::next(),
            tables,
            state: Mutex::new(CubeState::solved(tables)),
            quiet: AtomicBool::new(false),
            listeners: Listeners::default(),
        };

        debug!("Created {} as {}", kind.name(), cube.id);

        cube
    }

    pub fn id(&self) -> CubeId {
        self.id
    }

    pub fn kind(&self) -> CubeKind {
        CubeKind::ALL[self.layer_count() - tables::MIN_LAYERS]
    }

    pub fn layer_count(&self) -> usize {
        self.tables.layer_count
    }

    pub fn corner_count(&self) -> usize {
        8
    }

    pub fn edge_count(&self) -> usize {
        self.tables.edge_count()
    }

    pub fn side_count(&self) -> usize {
        self.tables.side_count()
    }

    /// Corners, edges and sides plus the center part
    pub fn part_count(&self) -> usize {
        self.corner_count() + self.edge_count() + self.side_count() + 1
    }

    pub(crate) fn tables(&self) -> &'static CubeTables {
        self.tables
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, CubeState> {
        self.state.lock()
    }

    /// Locks this cube and a different one in ascending id order and returns
    /// the guards as (this, that)
    fn lock_pair<'a>(
        &'a self,
        that: &'a Cube,
    ) -> (MutexGuard<'a, CubeState>, MutexGuard<'a, CubeState>) {
        debug_assert_ne!(self.id, that.id);

        if self.id < that.id {
            let mine = self.state.lock();
            let theirs = that.state.lock();
            (mine, theirs)
        } else {
            let theirs = that.state.lock();
            let mine = self.state.lock();
            (mine, theirs)
        }
    }

    fn check_layer_count(&self, that: &Cube) -> Result<(), CubeError> {
        if self.layer_count() == that.layer_count() {
            Ok(())
        } else {
            Err(CubeError::LayerCountMismatch {
                expected: self.layer_count(),
                actual: that.layer_count(),
            })
        }
    }

    pub fn reset(&self) {
        self.state.lock().reset();
        self.fire(CubeEvent::changed(self.id));
    }

    pub fn is_solved(&self) -> bool {
        self.state.lock().is_solved()
    }

    pub fn corner_locations(&self) -> Vec<usize> {
        self.state.lock().corners.locations()
    }

    pub fn corner_orientations(&self) -> Vec<u8> {
        self.state.lock().corners.orientations()
    }

    pub fn edge_locations(&self) -> Vec<usize> {
        self.state.lock().edges.locations()
    }

    pub fn edge_orientations(&self) -> Vec<u8> {
        self.state.lock().edges.orientations()
    }

    pub fn side_locations(&self) -> Vec<usize> {
        self.state.lock().sides.locations()
    }

    pub fn side_orientations(&self) -> Vec<u8> {
        self.state.lock().sides.orientations()
    }

    /// Replaces the corner state. `locations[l]` is the corner at location
    /// `l` and `orientations[l]` its orientation.
    ///
    /// # Errors
    ///
    /// Fails without touching the cube if an array has the wrong length or
    /// the locations are not a permutation
    pub fn set_corners(&self, locations: &[usize], orientations: &[u8]) -> Result<(), CubeError> {
        self.replace(PartType::Corner, locations, orientations)
    }

    /// # Errors
    ///
    /// See [`Cube::set_corners`]
    pub fn set_edges(&self, locations: &[usize], orientations: &[u8]) -> Result<(), CubeError> {
        self.replace(PartType::Edge, locations, orientations)
    }

    /// # Errors
    ///
    /// See [`Cube::set_corners`]
    pub fn set_sides(&self, locations: &[usize], orientations: &[u8]) -> Result<(), CubeError> {
        self.replace(PartType::Side, locations, orientations)
    }

    fn replace(
        &self,
        category: PartType,
        locations: &[usize],
        orientations: &[u8],
    ) -> Result<(), CubeError> {
        {
            let mut state = self.state.lock();
            let parts = state.part_set_mut(category);
            parts.validate(category, locations, orientations)?;
            parts.replace(locations, orientations);
            state.net = NetTransform::General;
        }

        self.fire(CubeEvent::changed(self.id));
        Ok(())
    }

    /// Offset of a category in the global index space
    fn offset(&self, category: PartType) -> usize {
        match category {
            PartType::Corner => 0,
            PartType::Edge => self.corner_count(),
            PartType::Side => self.corner_count() + self.edge_count(),
            PartType::Center => self.part_count() - 1,
        }
    }

    /// Splits a global part or location index into its category and the
    /// index within the category
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below the part count
    fn split_index(&self, index: usize) -> (PartType, usize) {
        let category = [PartType::Center, PartType::Side, PartType::Edge, PartType::Corner]
            .into_iter()
            .find(|&category| index >= self.offset(category))
            .unwrap_or(PartType::Corner);

        assert!(
            index < self.part_count(),
            "index {index} is out of range for {} parts",
            self.part_count()
        );

        (category, index - self.offset(category))
    }

    /// # Panics
    ///
    /// Panics if `part` is not below the part count
    pub fn part_type(&self, part: usize) -> PartType {
        self.split_index(part).0
    }

    /// The part at a global location. The center part never moves.
    ///
    /// # Panics
    ///
    /// Panics if `location` is not below the part count
    pub fn part_at(&self, location: usize) -> usize {
        match self.split_index(location) {
            (PartType::Center, _) => location,
            (category, local) => {
                self.offset(category) + self.state.lock().part_set(category).part_at(local)
            }
        }
    }

    /// The global location of a part
    ///
    /// # Panics
    ///
    /// Panics if `part` is not below the part count
    pub fn part_location(&self, part: usize) -> usize {
        match self.split_index(part) {
            (PartType::Center, _) => part,
            (category, local) => {
                self.offset(category) + self.state.lock().part_set(category).location_of(local)
            }
        }
    }

    /// The orientation of a part. For the center part this is the cube
    /// orientation, which may be unknown.
    ///
    /// # Panics
    ///
    /// Panics if `part` is not below the part count
    pub fn part_orientation(&self, part: usize) -> Option<u8> {
        let (category, local) = self.split_index(part);
        let state = self.state.lock();
        match category {
            PartType::Center => state.cube_orientation(),
            _ => {
                let parts = state.part_set(category);
                Some(parts.orientation_at(parts.location_of(local)))
            }
        }
    }

    /// Location, orientation and category of a part under one lock
    pub(crate) fn placement(&self, part: usize) -> (PartType, usize, u8) {
        let (category, local) = self.split_index(part);
        let state = self.state.lock();
        match category {
            PartType::Center => (category, 0, state.cube_orientation().unwrap_or(0)),
            _ => {
                let parts = state.part_set(category);
                let location = parts.location_of(local);
                (category, location, parts.orientation_at(location))
            }
        }
    }

    pub fn corner_at(&self, location: usize) -> usize {
        self.state.lock().corners.part_at(location)
    }

    pub fn corner_location(&self, corner: usize) -> usize {
        self.state.lock().corners.location_of(corner)
    }

    pub fn corner_orientation(&self, corner: usize) -> u8 {
        let state = self.state.lock();
        state.corners.orientation_at(state.corners.location_of(corner))
    }

    pub fn edge_at(&self, location: usize) -> usize {
        self.state.lock().edges.part_at(location)
    }

    pub fn edge_location(&self, edge: usize) -> usize {
        self.state.lock().edges.location_of(edge)
    }

    pub fn edge_orientation(&self, edge: usize) -> u8 {
        let state = self.state.lock();
        state.edges.orientation_at(state.edges.location_of(edge))
    }

    pub fn side_at(&self, location: usize) -> usize {
        self.state.lock().sides.part_at(location)
    }

    pub fn side_location(&self, side: usize) -> usize {
        self.state.lock().sides.location_of(side)
    }

    pub fn side_orientation(&self, side: usize) -> u8 {
        let state = self.state.lock();
        state.sides.orientation_at(state.sides.location_of(side))
    }

    /// Which of the 24 rotations of the whole cube the puzzle is in, or
    /// `None` when the side parts do not define one
    pub fn cube_orientation(&self) -> Option<u8> {
        self.state.lock().cube_orientation()
    }

    /// Global indices of the corners, edges and sides that are away from
    /// home or twisted
    pub fn unsolved_parts(&self) -> Vec<usize> {
        let state = self.state.lock();
        [PartType::Corner, PartType::Edge, PartType::Side]
            .into_iter()
            .flat_map(|category| {
                let offset = self.offset(category);
                state
                    .part_set(category)
                    .unsolved()
                    .map(move |l| l + offset)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Turns the layers selected by `layer_mask` about `axis`
    ///
    /// # Errors
    ///
    /// Fails if the angle is outside `-2..=2` or the mask selects a layer the
    /// cube doesn't have
    pub fn transform(&self, axis: Axis, layer_mask: u32, angle: i8) -> Result<(), CubeError> {
        self.apply(Turn::new(axis, layer_mask, angle))
    }

    /// # Errors
    ///
    /// See [`Cube::transform`]
    pub fn apply(&self, turn: Turn) -> Result<(), CubeError> {
        turn.validate(self.layer_count())?;
        if turn.is_noop() {
            return Ok(());
        }

        trace!("Turning {} by {turn}", self.id);
        let affected = self.state.lock().turn(self.tables, turn);

        self.fire(CubeEvent::twisted(self.id, turn, affected));
        Ok(())
    }

    /// Applies everything that happened to `that` since it was solved on top
    /// of this cube's current state. Both cubes stay locked until the state
    /// is updated; listeners hear about it afterwards.
    ///
    /// # Errors
    ///
    /// Fails if the cubes have different layer counts
    pub fn transform_by(&self, that: &Cube) -> Result<(), CubeError> {
        self.check_layer_count(that)?;

        let merge = if self.id == that.id {
            let mut state = self.state.lock();
            let snapshot = state.clone();
            state.merge(self.tables, &snapshot)
        } else {
            let (mut mine, theirs) = self.lock_pair(that);
            mine.merge(self.tables, &theirs)
        };

        match merge {
            Merge::Nothing => {}
            Merge::Replayed(turn, affected) => {
                trace!("Replayed {turn} of {} onto {}", that.id, self.id);
                self.fire(CubeEvent::twisted(self.id, turn, affected));
            }
            Merge::Composed => {
                debug!("Composed the full state of {} onto {}", that.id, self.id);
                self.fire(CubeEvent::changed(self.id));
            }
        }

        Ok(())
    }

    /// Copies the state of `that` into this cube
    ///
    /// # Errors
    ///
    /// Fails if the cubes have different layer counts
    pub fn set_to(&self, that: &Cube) -> Result<(), CubeError> {
        self.check_layer_count(that)?;

        if self.id != that.id {
            let (mut mine, theirs) = self.lock_pair(that);
            mine.copy_from(&theirs);
        }

        self.fire(CubeEvent::changed(self.id));
        Ok(())
    }

    pub fn add_listener(&self, listener: Arc<dyn CubeListener>) {
        self.listeners.add(listener);
    }

    /// Removes one registration of `listener`, returning whether there was
    /// one
    pub fn remove_listener(&self, listener: &Arc<dyn CubeListener>) -> bool {
        self.listeners.remove(listener)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet.load(Ordering::SeqCst)
    }

    /// While quiet no events fire. Leaving quiet mode fires a single
    /// "changed" event no matter how much happened in between.
    pub fn set_quiet(&self, quiet: bool) {
        let was_quiet = self.quiet.swap(quiet, Ordering::SeqCst);
        if was_quiet && !quiet {
            self.fire(CubeEvent::changed(self.id));
        }
    }

    pub(crate) fn fire(&self, event: CubeEvent) {
        if !self.is_quiet() {
            self.listeners.notify(&event);
        }
    }
}

impl PartialEq for Cube {
    fn eq(&self, other: &Self) -> bool {
        if self.id == other.id {
            return true;
        }
        if self.layer_count() != other.layer_count() {
            return false;
        }

        let (mine, theirs) = self.lock_pair(other);
        mine.same_parts(&theirs)
    }
}

impl Eq for Cube {}

impl Hash for Cube {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let guard = self.state.lock();
        guard.corners.hash(state);
        guard.edges.hash(state);
        guard.sides.hash(state);
    }
}

impl Clone for Cube {
    /// A copy of the state under a fresh id, without listeners
    fn clone(&self) -> Self {
        let state = self.state.lock().clone();
        Cube {
            id: CubeId::next(),
            tables: self.tables,
            state: Mutex::new(state),
            quiet: AtomicBool::new(self.is_quiet()),
            listeners: Listeners::default(),
        }
    }
}

impl fmt::Debug for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Cube")
            .field("id", &self.id)
            .field("layer_count", &self.layer_count())
            .field("corners", &state.corners)
            .field("edges", &state.edges)
            .field("sides", &state.sides)
            .field("quiet", &self.is_quiet())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_layer_counts() {
        for kind in CubeKind::ALL {
            assert_eq!(CubeKind::from_layer_count(kind.layer_count()), Ok(kind));
        }
        assert_eq!(
            CubeKind::from_layer_count(1),
            Err(CubeError::InvalidLayerCount(1))
        );
        assert_eq!(
            CubeKind::from_layer_count(8),
            Err(CubeError::InvalidLayerCount(8))
        );
    }

    #[test]
    fn global_indices_split_by_category() {
        let cube = Cube::new(CubeKind::Revenge);
        assert_eq!(cube.part_count(), 8 + 24 + 24 + 1);
        assert_eq!(cube.split_index(7), (PartType::Corner, 7));
        assert_eq!(cube.split_index(8), (PartType::Edge, 0));
        assert_eq!(cube.split_index(31), (PartType::Edge, 23));
        assert_eq!(cube.split_index(32), (PartType::Side, 0));
        assert_eq!(cube.split_index(56), (PartType::Center, 0));

        let pocket = Cube::new(CubeKind::Pocket);
        assert_eq!(pocket.part_type(8), PartType::Center);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn global_index_past_the_center() {
        Cube::new(CubeKind::Rubiks).part_type(27);
    }
}
