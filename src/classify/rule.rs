use crate::classify::fingers::{self, ExtendedFingers};
use crate::config::ClassifierConfig;
use crate::landmarks::{FaceLandmarks, HandLandmarks, HandSet};
use crate::GestureLabel;

/// Everything one classification call sees. Borrowed for the duration of the
/// call; rules never keep references past `matches`.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    pub primary: Option<&'a HandLandmarks>,
    pub hands: &'a HandSet,
    pub face: Option<&'a FaceLandmarks>,
    /// Strict extension of the primary hand, `None` when it is absent or short.
    pub primary_fingers: Option<ExtendedFingers>,
}

impl<'a> FrameInput<'a> {
    pub fn new(
        primary: Option<&'a HandLandmarks>,
        hands: &'a HandSet,
        face: Option<&'a FaceLandmarks>,
    ) -> Self {
        Self {
            primary,
            hands,
            face,
            primary_fingers: primary.and_then(fingers::strictly_extended),
        }
    }
}

/// One link of the gesture chain.
///
/// Rules are pure predicates over a single frame. A rule whose landmarks are
/// missing simply does not match; it must never panic or report an error, so
/// the chain can fall through to the next rule.
pub trait GestureRule: Send + Sync {
    /// Rule identifier, used in logs and classification traces.
    fn name(&self) -> &'static str;

    /// Label produced when the rule matches.
    fn label(&self) -> GestureLabel;

    /// Evaluate the rule on one frame.
    fn matches(&self, input: &FrameInput<'_>, config: &ClassifierConfig) -> bool;
}
