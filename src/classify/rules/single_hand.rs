//! Rules driven by the primary hand's strict finger extension.

use crate::classify::fingers::Finger;
use crate::classify::rule::{FrameInput, GestureRule};
use crate::config::ClassifierConfig;
use crate::landmarks::hand;
use crate::GestureLabel;

/// Index finger alone, tip resting on the chin or lips.
///
/// Same finger configuration as `CerraoRule`, so it must run first.
pub struct ThinkingRule;

impl GestureRule for ThinkingRule {
    fn name(&self) -> &'static str {
        "thinking"
    }

    fn label(&self) -> GestureLabel {
        GestureLabel::Thinking
    }

    fn matches(&self, input: &FrameInput<'_>, config: &ClassifierConfig) -> bool {
        index_finger_on_chin(input, config).unwrap_or(false)
    }
}

fn index_finger_on_chin(input: &FrameInput<'_>, config: &ClassifierConfig) -> Option<bool> {
    if !input.primary_fingers?.is_exactly(&[Finger::Index]) {
        return Some(false);
    }
    let face = input.face?;
    let tip = input.primary?.get(hand::INDEX_TIP)?;
    let indices = &config.face;
    let chin = face.get(indices.chin)?;
    let chin_bottom = face.get(indices.chin_bottom)?;
    let lower_lip = face.get(indices.lower_lip)?;
    let upper_lip = face.get(indices.upper_lip)?;
    let t = &config.thresholds.thinking;

    // Pointing up in the air above the face is cerrao, not thinking.
    let below_nose = tip.y > upper_lip.y - t.above_lip_tolerance;
    let touching = tip.distance(&chin) < t.chin_radius
        || tip.distance(&chin_bottom) < t.chin_radius
        || tip.distance(&lower_lip) < t.lip_radius
        || tip.distance(&upper_lip) < t.lip_radius;
    Some(below_nose && touching)
}

/// Index finger up, the other three curled.
pub struct CerraoRule;

impl GestureRule for CerraoRule {
    fn name(&self) -> &'static str {
        "cerrao"
    }

    fn label(&self) -> GestureLabel {
        GestureLabel::Cerrao
    }

    fn matches(&self, input: &FrameInput<'_>, _config: &ClassifierConfig) -> bool {
        input
            .primary_fingers
            .is_some_and(|fingers| fingers.is_exactly(&[Finger::Index]))
    }
}

/// Index and middle up, ring and pinky failing the strict test.
pub struct PeaceRule;

impl GestureRule for PeaceRule {
    fn name(&self) -> &'static str {
        "peace"
    }

    fn label(&self) -> GestureLabel {
        GestureLabel::Peace
    }

    fn matches(&self, input: &FrameInput<'_>, _config: &ClassifierConfig) -> bool {
        input
            .primary_fingers
            .is_some_and(|fingers| fingers.is_exactly(&[Finger::Index, Finger::Middle]))
    }
}
