//! Synthetic landmark poses.
//!
//! Geometrically plausible hands and faces for the scripted source, demos and
//! tests. Coordinates are normalized image space, y grows downward.

use crate::landmarks::{face, hand as idx, FaceLandmarks, HandLandmarks, Point, HAND_LANDMARK_COUNT};

const FINGER_BASES: [(usize, usize, usize, usize); 4] = [
    (idx::INDEX_MCP, idx::INDEX_PIP, idx::INDEX_DIP, idx::INDEX_TIP),
    (idx::MIDDLE_MCP, idx::MIDDLE_PIP, idx::MIDDLE_DIP, idx::MIDDLE_TIP),
    (idx::RING_MCP, idx::RING_PIP, idx::RING_DIP, idx::RING_TIP),
    (idx::PINKY_MCP, idx::PINKY_PIP, idx::PINKY_DIP, idx::PINKY_TIP),
];

/// Upright hand with knuckles (MCP row) at `(cx, cy)`.
///
/// `extended` is index, middle, ring, pinky. Extended fingers rise 0.08 above
/// the knuckles; curled ones fold back so the tip ends below the PIP joint.
/// Fingers sit 0.02 apart, index leftmost at `cx - 0.03`; the wrist is 0.15
/// below the knuckles.
pub fn hand(cx: f32, cy: f32, extended: [bool; 4]) -> HandLandmarks {
    let mut points = vec![Point::default(); HAND_LANDMARK_COUNT];
    points[idx::WRIST] = Point::new(cx, cy + 0.15);
    points[idx::THUMB_CMC] = Point::new(cx - 0.05, cy + 0.12);
    points[idx::THUMB_MCP] = Point::new(cx - 0.07, cy + 0.09);
    points[idx::THUMB_IP] = Point::new(cx - 0.08, cy + 0.06);
    points[idx::THUMB_TIP] = Point::new(cx - 0.09, cy + 0.04);

    for (i, ((mcp, pip, dip, tip), up)) in FINGER_BASES.iter().zip(extended).enumerate() {
        let x = cx - 0.03 + 0.02 * i as f32;
        points[*mcp] = Point::new(x, cy);
        if up {
            points[*pip] = Point::new(x, cy - 0.04);
            points[*dip] = Point::new(x, cy - 0.06);
            points[*tip] = Point::new(x, cy - 0.08);
        } else {
            points[*pip] = Point::new(x, cy - 0.02);
            points[*dip] = Point::new(x, cy);
            points[*tip] = Point::new(x, cy + 0.01);
        }
    }
    HandLandmarks::from_points(points)
}

pub fn fist(cx: f32, cy: f32) -> HandLandmarks {
    hand(cx, cy, [false; 4])
}

pub fn pointing_up(cx: f32, cy: f32) -> HandLandmarks {
    hand(cx, cy, [true, false, false, false])
}

pub fn peace_sign(cx: f32, cy: f32) -> HandLandmarks {
    hand(cx, cy, [true, true, false, false])
}

pub fn open_palm(cx: f32, cy: f32) -> HandLandmarks {
    hand(cx, cy, [true; 4])
}

/// Index finger up with its tip resting just beside the chin of `face`.
pub fn index_on_chin() -> HandLandmarks {
    pointing_up(0.55, 0.74)
}

/// Hand held sideways, fingers pointing right at shoulder height: reads as
/// horizontal, not vertical. Only the index passes the loose test.
pub fn flat_hand() -> HandLandmarks {
    let coords: [(f32, f32); HAND_LANDMARK_COUNT] = [
        (0.40, 0.40),
        (0.42, 0.36),
        (0.44, 0.34),
        (0.46, 0.33),
        (0.48, 0.32),
        (0.46, 0.37),
        (0.50, 0.372),
        (0.53, 0.371),
        (0.56, 0.37),
        (0.46, 0.39),
        (0.51, 0.39),
        (0.55, 0.39),
        (0.58, 0.39),
        (0.46, 0.41),
        (0.50, 0.41),
        (0.53, 0.41),
        (0.56, 0.41),
        (0.45, 0.43),
        (0.48, 0.43),
        (0.49, 0.43),
        (0.50, 0.43),
    ];
    HandLandmarks::from_points(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
}

/// Hand held level with its wrist at `(wx, wy)`, fingers pointing right.
///
/// Knuckles sit 0.06 right of the wrist, so the palm centre is `(wx + 0.03, wy)`.
/// Fingertips lie on one row 0.01 above the wrist, starting 0.10 right of it
/// and spread over `tip_span` in x. Reads as horizontal and never vertical.
pub fn sideways_hand(wx: f32, wy: f32, tip_span: f32) -> HandLandmarks {
    let mut points = vec![Point::new(wx, wy); HAND_LANDMARK_COUNT];
    points[idx::THUMB_CMC] = Point::new(wx + 0.02, wy - 0.03);
    points[idx::THUMB_MCP] = Point::new(wx + 0.04, wy - 0.04);
    points[idx::THUMB_IP] = Point::new(wx + 0.06, wy - 0.045);
    points[idx::THUMB_TIP] = Point::new(wx + 0.08, wy - 0.05);
    for (i, (mcp, pip, dip, tip)) in FINGER_BASES.iter().enumerate() {
        let tip_x = wx + 0.10 + tip_span * i as f32 / 3.0;
        points[*mcp] = Point::new(wx + 0.06, wy);
        points[*pip] = Point::new((wx + 0.06 + tip_x) / 2.0, wy);
        points[*dip] = Point::new((wx + 0.06 + 3.0 * tip_x) / 4.0, wy - 0.005);
        points[*tip] = Point::new(tip_x, wy - 0.01);
    }
    HandLandmarks::from_points(points)
}

/// Sparse face around a mouth centred at (0.50, 0.61).
///
/// Closed: lip gap 0.005 (below the laughing threshold). Open: lip gap 0.04.
/// Carries both right-corner candidates (291 and 84).
pub fn face(mouth_open: bool) -> FaceLandmarks {
    let (upper_y, lower_y) = if mouth_open { (0.59, 0.63) } else { (0.605, 0.61) };
    FaceLandmarks::from_sparse([
        (face::UPPER_LIP, Point::new(0.50, upper_y)),
        (face::LOWER_LIP, Point::new(0.50, lower_y)),
        (face::LEFT_MOUTH_CORNER, Point::new(0.46, 0.61)),
        (face::RIGHT_MOUTH_CORNER, Point::new(0.54, 0.61)),
        (84, Point::new(0.52, lower_y + 0.01)),
        (face::CHIN, Point::new(0.50, 0.68)),
        (face::CHIN_BOTTOM, Point::new(0.50, 0.72)),
    ])
}
