use crate::classify::mouth::mouth_gesture;
use crate::classify::rule::{FrameInput, GestureRule};
use crate::config::ClassifierConfig;
use crate::GestureLabel;

/// Open mouth wins over every finger rule, with or without hands.
pub struct JijijaRule;

impl GestureRule for JijijaRule {
    fn name(&self) -> &'static str {
        "jijija"
    }

    fn label(&self) -> GestureLabel {
        GestureLabel::Jijija
    }

    fn matches(&self, input: &FrameInput<'_>, config: &ClassifierConfig) -> bool {
        mouth_gesture(input.face, &config.face, &config.thresholds.mouth) == GestureLabel::Jijija
    }
}
