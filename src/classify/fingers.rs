//! Finger-extension predicates.
//!
//! Both tests are straight-line proxies for "finger points up" in image space
//! (smaller y is higher). They know nothing about hand rotation, so a
//! sideways or downward hand reads as curled.
//!
//! - strict: `tip.y < pip.y < mcp.y`
//! - loose: `tip.y < pip.y`
//!
//! The two are not interchangeable; strict implies loose, never the reverse.

use crate::landmarks::{hand, HandLandmarks};

/// The four non-thumb fingers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Landmark indices as (tip, pip, mcp).
    pub fn joints(self) -> (usize, usize, usize) {
        match self {
            Finger::Index => (hand::INDEX_TIP, hand::INDEX_PIP, hand::INDEX_MCP),
            Finger::Middle => (hand::MIDDLE_TIP, hand::MIDDLE_PIP, hand::MIDDLE_MCP),
            Finger::Ring => (hand::RING_TIP, hand::RING_PIP, hand::RING_MCP),
            Finger::Pinky => (hand::PINKY_TIP, hand::PINKY_PIP, hand::PINKY_MCP),
        }
    }

    fn bit(self) -> u8 {
        match self {
            Finger::Index => 0b0001,
            Finger::Middle => 0b0010,
            Finger::Ring => 0b0100,
            Finger::Pinky => 0b1000,
        }
    }
}

/// Strict three-point test on an explicit index triple. Missing points read as
/// "not extended".
pub fn is_finger_extended(hand: &HandLandmarks, tip: usize, pip: usize, mcp: usize) -> bool {
    strict_triple(hand, tip, pip, mcp).unwrap_or(false)
}

/// Loose two-point test on an explicit index pair.
pub fn is_tip_above_pip(hand: &HandLandmarks, tip: usize, pip: usize) -> bool {
    loose_pair(hand, tip, pip).unwrap_or(false)
}

/// Strict test for `finger`; `None` when a joint is missing.
pub fn strict(hand: &HandLandmarks, finger: Finger) -> Option<bool> {
    let (tip, pip, mcp) = finger.joints();
    strict_triple(hand, tip, pip, mcp)
}

/// Loose test for `finger`; `None` when a joint is missing.
pub fn loose(hand: &HandLandmarks, finger: Finger) -> Option<bool> {
    let (tip, pip, _) = finger.joints();
    loose_pair(hand, tip, pip)
}

fn strict_triple(hand: &HandLandmarks, tip: usize, pip: usize, mcp: usize) -> Option<bool> {
    let (tip, pip, mcp) = (hand.get(tip)?, hand.get(pip)?, hand.get(mcp)?);
    Some(tip.y < pip.y && pip.y < mcp.y)
}

fn loose_pair(hand: &HandLandmarks, tip: usize, pip: usize) -> Option<bool> {
    Some(hand.get(tip)?.y < hand.get(pip)?.y)
}

/// Set of fingers that passed an extension test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtendedFingers(u8);

impl ExtendedFingers {
    pub fn from_fingers(fingers: &[Finger]) -> Self {
        Self(fingers.iter().fold(0, |acc, finger| acc | finger.bit()))
    }

    pub fn contains(&self, finger: Finger) -> bool {
        self.0 & finger.bit() != 0
    }

    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when exactly `fingers` are extended, nothing more and nothing less.
    pub fn is_exactly(&self, fingers: &[Finger]) -> bool {
        *self == Self::from_fingers(fingers)
    }

    fn insert(&mut self, finger: Finger) {
        self.0 |= finger.bit();
    }
}

/// Strict test over all four fingers. `None` if any joint is missing.
pub fn strictly_extended(hand: &HandLandmarks) -> Option<ExtendedFingers> {
    collect(hand, &Finger::ALL, strict)
}

/// Loose test over `fingers`. `None` if any of their joints is missing.
pub fn loosely_extended(hand: &HandLandmarks, fingers: &[Finger]) -> Option<ExtendedFingers> {
    collect(hand, fingers, loose)
}

fn collect(
    hand: &HandLandmarks,
    fingers: &[Finger],
    test: fn(&HandLandmarks, Finger) -> Option<bool>,
) -> Option<ExtendedFingers> {
    let mut set = ExtendedFingers::default();
    for &finger in fingers {
        if test(hand, finger)? {
            set.insert(finger);
        }
    }
    Some(set)
}
