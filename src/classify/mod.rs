//! Gesture classification.
//!
//! `GestureClassifier::classify` is a pure, total function of one frame's
//! landmarks. It holds configuration only; nothing carries over between
//! calls, so the same input always yields the same label.
//!
//! Evaluation order:
//! 1. no primary hand: mouth predicate only (`jijija` or `none`)
//! 2. the rule chain (`RuleChain::standard`), first match wins
//! 3. `none`

mod chain;
pub mod fingers;
pub mod mouth;
mod rule;
pub mod rules;

pub use chain::RuleChain;
pub use fingers::{ExtendedFingers, Finger};
pub use mouth::{mouth_gesture, mouth_metrics, MouthMetrics};
pub use rule::{FrameInput, GestureRule};
pub use rules::{hand_pose, HandPose};

use serde::Serialize;

use crate::config::ClassifierConfig;
use crate::landmarks::{FaceLandmarks, HandLandmarks, HandSet};
use crate::GestureLabel;

/// Outcome of one classification with the evidence behind it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub label: GestureLabel,
    /// Name of the rule that fired; `None` when nothing matched or no hand was present.
    pub rule: Option<&'static str>,
    pub mouth: Option<MouthMetrics>,
    /// Orientation of each hand, reported only when exactly two are present.
    pub hand_poses: Option<(HandPose, HandPose)>,
}

pub struct GestureClassifier {
    config: ClassifierConfig,
    chain: RuleChain,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            chain: RuleChain::standard(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn chain(&self) -> &RuleChain {
        &self.chain
    }

    /// Classify one frame.
    ///
    /// `primary` is normally `all_hands.primary()`; it is passed separately
    /// so callers can classify a face-only frame while still reporting hands.
    pub fn classify(
        &self,
        primary: Option<&HandLandmarks>,
        all_hands: &HandSet,
        face: Option<&FaceLandmarks>,
    ) -> GestureLabel {
        let Some(primary) = primary else {
            return mouth_gesture(face, &self.config.face, &self.config.thresholds.mouth);
        };
        let input = FrameInput::new(Some(primary), all_hands, face);
        self.chain.evaluate(&input, &self.config)
    }

    /// Classify using the first hand of `hands` as the primary hand.
    pub fn classify_frame(&self, hands: &HandSet, face: Option<&FaceLandmarks>) -> GestureLabel {
        self.classify(hands.primary(), hands, face)
    }

    /// Same decision as `classify_frame`, plus the measurements that drove it.
    pub fn explain(&self, hands: &HandSet, face: Option<&FaceLandmarks>) -> Classification {
        let mouth = face.and_then(|face| mouth_metrics(face, &self.config.face));
        let hand_poses = hands.pair().and_then(|(first, second)| {
            let t = &self.config.thresholds.timeout;
            Some((hand_pose(first, t)?, hand_pose(second, t)?))
        });

        let (label, rule) = match hands.primary() {
            None => (
                mouth_gesture(face, &self.config.face, &self.config.thresholds.mouth),
                None,
            ),
            Some(primary) => {
                let input = FrameInput::new(Some(primary), hands, face);
                match self.chain.first_match(&input, &self.config) {
                    Some(rule) => (rule.label(), Some(rule.name())),
                    None => (GestureLabel::None, None),
                }
            }
        };

        Classification {
            label,
            rule,
            mouth,
            hand_poses,
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}
