mod face;
mod single_hand;
mod two_hand;

pub use face::JijijaRule;
pub use single_hand::{CerraoRule, PeaceRule, ThinkingRule};
pub use two_hand::{hand_pose, HandPose, MimimiRule, SixsevenRule, TimeoutRule};
