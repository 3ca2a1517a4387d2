use std::sync::Arc;

use crossbeam_channel::Sender;
use log::warn;
use parking_lot::Mutex;

use crate::{cube::CubeId, turn::Turn};

/// What happened to a cube. `turn` is set for "twisted" events only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CubeEvent {
    cube: CubeId,
    turn: Option<Turn>,
    affected_locations: Vec<usize>,
}

impl CubeEvent {
    pub(crate) fn twisted(cube: CubeId, turn: Turn, affected_locations: Vec<usize>) -> CubeEvent {
        CubeEvent {
            cube,
            turn: Some(turn),
            affected_locations,
        }
    }

    pub(crate) fn changed(cube: CubeId) -> CubeEvent {
        CubeEvent {
            cube,
            turn: None,
            affected_locations: Vec::new(),
        }
    }

    pub fn cube(&self) -> CubeId {
        self.cube
    }

    pub fn turn(&self) -> Option<Turn> {
        self.turn
    }

    /// Global location indices whose part changed, in ascending order
    pub fn affected_locations(&self) -> &[usize] {
        &self.affected_locations
    }
}

/// Receives notifications from every cube it is added to. Events are
/// delivered after the cube has released its lock, so listeners may read the
/// cube again.
pub trait CubeListener: Send + Sync {
    fn cube_twisted(&self, _event: &CubeEvent) {}

    fn cube_changed(&self, _event: &CubeEvent) {}
}

impl CubeListener for Sender<CubeEvent> {
    fn cube_twisted(&self, event: &CubeEvent) {
        if self.send(event.clone()).is_err() {
            warn!("Dropped twist of cube {}, the receiver is gone", event.cube);
        }
    }

    fn cube_changed(&self, event: &CubeEvent) {
        if self.send(event.clone()).is_err() {
            warn!("Dropped change of cube {}, the receiver is gone", event.cube);
        }
    }
}

#[derive(Default)]
pub(crate) struct Listeners(Mutex<Vec<Arc<dyn CubeListener>>>);

impl Listeners {
    pub(crate) fn add(&self, listener: Arc<dyn CubeListener>) {
        self.0.lock().push(listener);
    }

    /// Removes the most recently added registration of `listener`
    pub(crate) fn remove(&self, listener: &Arc<dyn CubeListener>) -> bool {
        let mut listeners = self.0.lock();
        match listeners.iter().rposition(|l| Arc::ptr_eq(l, listener)) {
            Some(i) => {
                listeners.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.0.lock().len()
    }

    /// Calls every listener, last added first. Works on a snapshot so that
    /// listeners may add or remove listeners while being notified.
    pub(crate) fn notify(&self, event: &CubeEvent) {
        let snapshot = self.0.lock().clone();
        for listener in snapshot.iter().rev() {
            match event.turn {
                Some(_) => listener.cube_twisted(event),
                None => listener.cube_changed(event),
            }
        }
    }
}
