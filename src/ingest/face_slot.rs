//! Single-writer face snapshot cell.
//!
//! The face detector runs on its own schedule. Its latest result is published
//! here tagged with the frame it was computed for, and the pipeline takes an
//! immutable snapshot once per classification. A snapshot for frame N is the
//! face for frame N or the newest earlier one; a face computed for a later
//! frame is never handed to an earlier one.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::landmarks::FaceLandmarks;

#[derive(Clone, Debug)]
struct FaceEntry {
    frame: u64,
    /// `None` records "face detector ran, found no face".
    face: Option<Arc<FaceLandmarks>>,
}

#[derive(Debug, Default)]
struct SlotState {
    latest: Option<FaceEntry>,
    /// Entry replaced by `latest`, kept so a detector running one frame ahead
    /// does not starve the frame being classified.
    previous: Option<FaceEntry>,
}

/// Cloneable handle to the shared face cell.
#[derive(Clone, Debug, Default)]
pub struct FaceSlot {
    state: Arc<Mutex<SlotState>>,
}

impl FaceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the face detector's result for `frame`. Results older than the
    /// current one are dropped.
    pub fn publish(&self, frame: u64, face: Option<FaceLandmarks>) {
        let mut state = self.lock();
        if let Some(latest) = &state.latest {
            if frame < latest.frame {
                log::debug!(
                    "dropping stale face for frame {} (have frame {})",
                    frame,
                    latest.frame
                );
                return;
            }
        }
        let entry = FaceEntry {
            frame,
            face: face.map(Arc::new),
        };
        let replaced = state.latest.replace(entry);
        if replaced.as_ref().is_some_and(|old| old.frame < frame) {
            state.previous = replaced;
        }
    }

    /// Immutable face for classifying `frame`, if one applies.
    pub fn snapshot_for(&self, frame: u64) -> Option<Arc<FaceLandmarks>> {
        let state = self.lock();
        let face = [state.latest.as_ref(), state.previous.as_ref()]
            .into_iter()
            .flatten()
            .find(|entry| entry.frame <= frame)
            .and_then(|entry| entry.face.clone());
        face
    }

    /// Frame index of the newest published result.
    pub fn latest_frame(&self) -> Option<u64> {
        self.lock().latest.as_ref().map(|entry| entry.frame)
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.latest = None;
        state.previous = None;
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // The state is two plain values; a panic mid-update cannot leave it torn.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::synthetic;

    #[test]
    fn snapshot_uses_same_or_earlier_frame() {
        let slot = FaceSlot::new();
        assert!(slot.snapshot_for(0).is_none());

        slot.publish(3, Some(synthetic::face(false)));
        assert!(slot.snapshot_for(2).is_none());
        assert!(slot.snapshot_for(3).is_some());
        assert!(slot.snapshot_for(10).is_some());
    }

    #[test]
    fn detector_running_ahead_keeps_prior_face() {
        let slot = FaceSlot::new();
        slot.publish(4, Some(synthetic::face(false)));
        slot.publish(5, Some(synthetic::face(true)));

        let for_four = slot.snapshot_for(4).unwrap();
        assert_eq!(*for_four, synthetic::face(false));
        let for_five = slot.snapshot_for(5).unwrap();
        assert_eq!(*for_five, synthetic::face(true));
    }

    #[test]
    fn lost_face_clears_snapshot_and_stale_results_are_dropped() {
        let slot = FaceSlot::new();
        slot.publish(1, Some(synthetic::face(false)));
        slot.publish(2, None);
        assert!(slot.snapshot_for(2).is_none());

        slot.publish(1, Some(synthetic::face(true)));
        assert_eq!(slot.latest_frame(), Some(2));
        assert!(slot.snapshot_for(2).is_none());
    }

    #[test]
    fn snapshot_is_unaffected_by_later_publish() {
        let slot = FaceSlot::new();
        slot.publish(1, Some(synthetic::face(false)));
        let snapshot = slot.snapshot_for(1).unwrap();
        slot.publish(2, Some(synthetic::face(true)));
        slot.clear();
        assert_eq!(*snapshot, synthetic::face(false));
        assert!(slot.snapshot_for(2).is_none());
    }
}
