//! Per-frame landmark data model.
//!
//! Everything in here is built fresh from detector output for one frame and
//! dropped after classification. Landmark indices are fixed by the hand and
//! face-mesh topologies; lookups go through `get` so a short or sparse set
//! degrades to `None` instead of panicking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of landmarks in a complete hand set.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Number of landmarks in a refined face mesh.
pub const FACE_MESH_LANDMARK_COUNT: usize = 478;

/// Maximum number of hands tracked per frame.
pub const MAX_HANDS: usize = 2;

/// Hand landmark indices (hand landmarker convention).
pub mod hand {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    /// Fingertips of the four non-thumb fingers.
    pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
}

/// Face mesh indices used by the gesture rules.
pub mod face {
    pub const UPPER_LIP: usize = 13;
    pub const LOWER_LIP: usize = 14;
    pub const CHIN: usize = 18;
    pub const LEFT_MOUTH_CORNER: usize = 61;
    pub const CHIN_BOTTOM: usize = 175;
    /// Right mouth corner. The mesh pairs 61 with 291 across the mouth;
    /// 84 sits on the lower-lip contour and is not a corner.
    pub const RIGHT_MOUTH_CORNER: usize = 291;
}

/// A single landmark in normalized image coordinates (y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Relative depth. Reported by some detectors, ignored by every rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    /// Euclidean distance in the image plane.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One detected hand. Normally 21 points; shorter sets are kept as-is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandLandmarks {
    points: Vec<Point>,
}

impl HandLandmarks {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Landmark at `index`, if the detector reported it with finite coordinates.
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied().filter(Point::is_finite)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() >= HAND_LANDMARK_COUNT
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// Hands reported for one frame, in detector order (no identity tracking).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandSet {
    hands: Vec<HandLandmarks>,
}

impl HandSet {
    /// Build a hand set, keeping at most `MAX_HANDS` in detector order.
    pub fn from_hands(mut hands: Vec<HandLandmarks>) -> Self {
        if hands.len() > MAX_HANDS {
            log::debug!(
                "hand set truncated from {} to {} hands",
                hands.len(),
                MAX_HANDS
            );
            hands.truncate(MAX_HANDS);
        }
        Self { hands }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// First hand in detector order.
    pub fn primary(&self) -> Option<&HandLandmarks> {
        self.hands.first()
    }

    /// Both hands, only when exactly two were reported.
    pub fn pair(&self) -> Option<(&HandLandmarks, &HandLandmarks)> {
        match self.hands.as_slice() {
            [first, second] => Some((first, second)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandLandmarks> {
        self.hands.iter()
    }
}

/// Face mesh landmarks for the single tracked face, keyed by mesh index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceLandmarks {
    points: BTreeMap<usize, Point>,
}

impl FaceLandmarks {
    /// Dense detector output: position in the slice is the mesh index.
    pub fn from_dense(points: Vec<Point>) -> Self {
        Self {
            points: points.into_iter().enumerate().collect(),
        }
    }

    /// Sparse output carrying only the indices of interest.
    pub fn from_sparse(points: impl IntoIterator<Item = (usize, Point)>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(&index).copied().filter(Point::is_finite)
    }

    pub fn insert(&mut self, index: usize, point: Point) {
        self.points.insert(index, point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
