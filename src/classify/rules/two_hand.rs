//! Rules that need exactly two hands. All of them use the loose extension
//! test, which tolerates the partial curl of hands held sideways.

use serde::Serialize;

use crate::classify::fingers::{self, Finger};
use crate::classify::rule::{FrameInput, GestureRule};
use crate::config::{ClassifierConfig, TimeoutThresholds};
use crate::landmarks::{hand, HandLandmarks, Point};
use crate::GestureLabel;

/// Both hands closed into fists.
pub struct MimimiRule;

impl GestureRule for MimimiRule {
    fn name(&self) -> &'static str {
        "mimimi"
    }

    fn label(&self) -> GestureLabel {
        GestureLabel::Mimimi
    }

    fn matches(&self, input: &FrameInput<'_>, _config: &ClassifierConfig) -> bool {
        let Some((first, second)) = input.hands.pair() else {
            return false;
        };
        let closed = |h: &HandLandmarks| {
            fingers::loosely_extended(h, &Finger::ALL).is_some_and(|set| set.is_empty())
        };
        closed(first) && closed(second)
    }
}

/// Orientation summary of one hand, computed from its wrist and fingertips.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HandPose {
    /// max - min of the four fingertip y values.
    pub y_spread: f32,
    /// max - min of the four fingertip x values.
    pub x_spread: f32,
    /// |wrist.y - mean fingertip y|
    pub wrist_offset: f32,
    /// Midway between the wrist and the mean fingertip.
    pub center: Point,
    pub horizontal: bool,
    pub vertical: bool,
}

/// Measure a hand's orientation. `None` if the wrist or a fingertip is missing.
pub fn hand_pose(hand: &HandLandmarks, t: &TimeoutThresholds) -> Option<HandPose> {
    let wrist = hand.get(hand::WRIST)?;
    let mut tips = [Point::default(); 4];
    for (slot, index) in tips.iter_mut().zip(hand::FINGERTIPS) {
        *slot = hand.get(index)?;
    }

    let (min_x, max_x) = bounds(tips.iter().map(|p| p.x));
    let (min_y, max_y) = bounds(tips.iter().map(|p| p.y));
    let mean_x = tips.iter().map(|p| p.x).sum::<f32>() / tips.len() as f32;
    let mean_y = tips.iter().map(|p| p.y).sum::<f32>() / tips.len() as f32;

    let y_spread = max_y - min_y;
    let x_spread = max_x - min_x;
    let wrist_offset = (wrist.y - mean_y).abs();
    Some(HandPose {
        y_spread,
        x_spread,
        wrist_offset,
        center: Point::new((wrist.x + mean_x) / 2.0, (wrist.y + mean_y) / 2.0),
        horizontal: y_spread < t.horizontal_y_spread_max || x_spread > t.horizontal_x_spread_min,
        vertical: wrist_offset > t.vertical_wrist_offset_min || y_spread > t.vertical_y_spread_min,
    })
}

fn bounds(values: impl Iterator<Item = f32>) -> (f32, f32) {
    values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// T shape: one hand flat, the other upright touching its palm.
///
/// A heuristic proximity/orientation test. When both hands read as both
/// horizontal and vertical, each assignment is tried.
pub struct TimeoutRule;

impl GestureRule for TimeoutRule {
    fn name(&self) -> &'static str {
        "timeout"
    }

    fn label(&self) -> GestureLabel {
        GestureLabel::Timeout
    }

    fn matches(&self, input: &FrameInput<'_>, config: &ClassifierConfig) -> bool {
        t_shape(input, &config.thresholds.timeout).unwrap_or(false)
    }
}

fn t_shape(input: &FrameInput<'_>, t: &TimeoutThresholds) -> Option<bool> {
    let (first, second) = input.hands.pair()?;
    for h in [first, second] {
        if fingers::loosely_extended(h, &Finger::ALL)?.is_empty() {
            return Some(false);
        }
    }

    let first_pose = hand_pose(first, t)?;
    let second_pose = hand_pose(second, t)?;

    let first_flat = first_pose.horizontal && second_pose.vertical;
    let second_flat = second_pose.horizontal && first_pose.vertical;
    if !first_flat && !second_flat {
        return Some(false);
    }

    let dx = (first_pose.center.x - second_pose.center.x).abs();
    let dy = (first_pose.center.y - second_pose.center.y).abs();
    if dx > t.center_distance_max || dy > t.center_distance_max {
        return Some(false);
    }

    let first_on_top = first_flat && touches_palm(first, &first_pose, second, t)?;
    let second_on_top = second_flat && touches_palm(second, &second_pose, first, t)?;
    Some(first_on_top || second_on_top)
}

/// Does the upright hand's pinky tip or wrist reach the flat hand's palm?
fn touches_palm(
    flat: &HandLandmarks,
    flat_pose: &HandPose,
    upright: &HandLandmarks,
    t: &TimeoutThresholds,
) -> Option<bool> {
    let palm = flat.get(hand::WRIST)?.midpoint(&flat.get(hand::MIDDLE_MCP)?);
    let from_pinky = upright.get(hand::PINKY_TIP)?.distance(&palm);
    let from_wrist = upright.get(hand::WRIST)?.distance(&palm);
    let min_dist = from_pinky.min(from_wrist);
    Some(
        (min_dist < t.contact_distance && flat_pose.x_spread > t.horizontal_x_span_min)
            || min_dist < t.close_contact_distance,
    )
}

/// Both hands open and held wide apart.
pub struct SixsevenRule;

const SIXSEVEN_FINGERS: [Finger; 3] = [Finger::Index, Finger::Middle, Finger::Ring];

impl GestureRule for SixsevenRule {
    fn name(&self) -> &'static str {
        "sixseven"
    }

    fn label(&self) -> GestureLabel {
        GestureLabel::Sixseven
    }

    fn matches(&self, input: &FrameInput<'_>, config: &ClassifierConfig) -> bool {
        balance_pose(input, config).unwrap_or(false)
    }
}

fn balance_pose(input: &FrameInput<'_>, config: &ClassifierConfig) -> Option<bool> {
    let (first, second) = input.hands.pair()?;
    let t = &config.thresholds.sixseven;
    for h in [first, second] {
        if fingers::loosely_extended(h, &SIXSEVEN_FINGERS)?.count() < t.extended_fingers_min {
            return Some(false);
        }
    }
    let spread = (first.get(hand::WRIST)?.x - second.get(hand::WRIST)?.x).abs();
    Some(spread > t.wrist_x_distance_min)
}
