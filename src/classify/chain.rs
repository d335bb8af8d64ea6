use crate::config::ClassifierConfig;
use crate::GestureLabel;

use super::rule::{FrameInput, GestureRule};
use super::rules::{
    CerraoRule, JijijaRule, MimimiRule, PeaceRule, SixsevenRule, ThinkingRule, TimeoutRule,
};

/// Ordered gesture rules. Evaluation stops at the first match.
pub struct RuleChain {
    rules: Vec<Box<dyn GestureRule>>,
}

impl RuleChain {
    /// The production order. Earlier rules shadow later ones:
    /// jijija, mimimi, thinking, cerrao, peace, timeout, sixseven.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Box::new(JijijaRule),
                Box::new(MimimiRule),
                Box::new(ThinkingRule),
                Box::new(CerraoRule),
                Box::new(PeaceRule),
                Box::new(TimeoutRule),
                Box::new(SixsevenRule),
            ],
        }
    }

    /// Rule names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First matching rule, or `None` when the frame falls through.
    pub fn first_match(
        &self,
        input: &FrameInput<'_>,
        config: &ClassifierConfig,
    ) -> Option<&dyn GestureRule> {
        self.rules
            .iter()
            .map(|rule| rule.as_ref())
            .find(|rule| rule.matches(input, config))
    }

    pub fn evaluate(&self, input: &FrameInput<'_>, config: &ClassifierConfig) -> GestureLabel {
        self.first_match(input, config)
            .map(|rule| rule.label())
            .unwrap_or_default()
    }
}

impl Default for RuleChain {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_order_puts_refinements_first() {
        let names = RuleChain::standard().names();
        assert_eq!(
            names,
            vec!["jijija", "mimimi", "thinking", "cerrao", "peace", "timeout", "sixseven"]
        );
        let pos = |name: &str| names.iter().position(|n| *n == name).unwrap();
        assert!(pos("thinking") < pos("cerrao"));
        assert!(pos("timeout") < pos("sixseven"));
    }

    #[test]
    fn rule_names_match_their_labels() {
        for name in RuleChain::standard().names() {
            let label: GestureLabel = name.parse().unwrap();
            assert_eq!(label.as_str(), name);
        }
    }
}
