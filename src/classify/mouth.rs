//! Mouth-open predicate, the only face-only gesture.

use serde::Serialize;

use crate::config::{FaceIndices, MouthThresholds};
use crate::landmarks::FaceLandmarks;
use crate::GestureLabel;

/// Raw mouth measurements, also surfaced in debug logs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MouthMetrics {
    /// |upper lip y - lower lip y|
    pub height: f32,
    /// |right corner x - left corner x|
    pub width: f32,
}

impl MouthMetrics {
    pub fn is_open(&self, thresholds: &MouthThresholds) -> bool {
        self.height > thresholds.height_min && self.width > thresholds.width_min
    }
}

/// Measure the mouth. `None` if any of the four lip/corner points is missing.
pub fn mouth_metrics(face: &FaceLandmarks, indices: &FaceIndices) -> Option<MouthMetrics> {
    let upper = face.get(indices.upper_lip)?;
    let lower = face.get(indices.lower_lip)?;
    let left = face.get(indices.left_mouth_corner)?;
    let right = face.get(indices.right_mouth_corner)?;
    Some(MouthMetrics {
        height: (upper.y - lower.y).abs(),
        width: (right.x - left.x).abs(),
    })
}

/// `Jijija` when the mouth is open past both thresholds, `None` otherwise
/// (including when no face or no mouth points are available).
pub fn mouth_gesture(
    face: Option<&FaceLandmarks>,
    indices: &FaceIndices,
    thresholds: &MouthThresholds,
) -> GestureLabel {
    match face.and_then(|face| mouth_metrics(face, indices)) {
        Some(metrics) if metrics.is_open(thresholds) => GestureLabel::Jijija,
        _ => GestureLabel::None,
    }
}
