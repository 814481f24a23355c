use parking_lot::Mutex;

use super::state::SharedState;
use crate::trace::EpochMarker;

/// Epoch markers requested during a session, under a lock of their own.
#[derive(Default)]
pub(crate) struct MarkerLog {
    markers: Mutex<Vec<EpochMarker>>,
}

impl MarkerLog {
    /// Append a marker stamped with the current fast sample count and return
    /// its id. The count is read under the lock so that ids and indices both
    /// follow call order.
    pub fn record(&self, state: &SharedState) -> u64 {
        let mut markers = self.markers.lock();

        let id = markers.len() as u64 + 1;
        markers.push(EpochMarker {
            id,
            fast_sample_idx: state.fast_count(),
        });

        id
    }

    pub fn take(&self) -> Vec<EpochMarker> {
        std::mem::take(&mut *self.markers.lock())
    }

    /// Discard all markers and begin a new session on `state`. Both happen
    /// under the marker lock, so a concurrent `record` lands entirely before
    /// the reset or entirely after it.
    pub fn reset(&self, state: &SharedState) {
        let mut markers = self.markers.lock();
        state.begin_session();
        markers.clear();
    }
}
