//! Gesture Kernel
//!
//! This crate turns per-frame hand and face landmarks into exactly one gesture
//! label and drives a meme display from it.
//!
//! # Architecture
//!
//! One frame flows one way through three stages:
//!
//! 1. **Ingest**: a `LandmarkSource` yields 0-2 hands and an optional face
//!    update per frame. Face updates land in a `FaceSlot` and are read back as
//!    an immutable snapshot for that frame.
//! 2. **Classify**: `GestureClassifier` runs the priority-ordered rule chain.
//!    It is total: partial or malformed landmarks degrade to `none`, never to
//!    an error.
//! 3. **Display**: `DisplayController` maps the label to an asset and only
//!    hands a new asset to the `Presenter` when the label changes.
//!
//! # Module Structure
//!
//! - `landmarks`: Point, HandLandmarks, HandSet, FaceLandmarks, index constants
//! - `classify`: finger/mouth predicates, gesture rules, the rule chain
//! - `config`: thresholds, face indices, asset settings (file + env layers)
//! - `ingest`: landmark sources (JSON lines, scripted) and the face snapshot slot
//! - `display`: asset catalog, presenters, swap-on-change controller
//! - `pipeline`: per-frame glue and run statistics

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod classify;
pub mod config;
pub mod display;
pub mod ingest;
pub mod landmarks;
pub mod pipeline;

pub use classify::{Classification, GestureClassifier};
pub use config::{ClassifierConfig, GestureConfig, Thresholds};
pub use display::{
    Asset, AssetCatalog, DisplayController, LogPresenter, Presenter, RecordingPresenter,
};
pub use ingest::{FaceSlot, FaceUpdate, JsonlSource, LandmarkFrame, LandmarkSource, ScriptedSource};
pub use landmarks::{FaceLandmarks, HandLandmarks, HandSet, Point};
pub use pipeline::{Pipeline, PipelineStats};

// -------------------- Gesture Labels --------------------

/// The closed gesture vocabulary. `None` is the initial value and the
/// fallback for anything the rules cannot decide.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GestureLabel {
    #[default]
    None,
    /// Laughing, mouth open.
    Jijija,
    /// Both hands closed into fists.
    Mimimi,
    /// Index finger up, others curled.
    Cerrao,
    /// Both hands open and spread apart, like a balance.
    Sixseven,
    /// Index finger resting on the chin or lips.
    Thinking,
    /// Index and middle fingers up.
    Peace,
    /// Two-hand T shape.
    Timeout,
}

impl GestureLabel {
    pub const ALL: [GestureLabel; 8] = [
        GestureLabel::None,
        GestureLabel::Jijija,
        GestureLabel::Mimimi,
        GestureLabel::Cerrao,
        GestureLabel::Sixseven,
        GestureLabel::Thinking,
        GestureLabel::Peace,
        GestureLabel::Timeout,
    ];

    /// Lookup key used by asset maps and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Jijija => "jijija",
            Self::Mimimi => "mimimi",
            Self::Cerrao => "cerrao",
            Self::Sixseven => "sixseven",
            Self::Thinking => "thinking",
            Self::Peace => "peace",
            Self::Timeout => "timeout",
        }
    }

    /// Capitalized name for status lines ("Gesture: Jijija").
    pub fn display_name(&self) -> String {
        let key = self.as_str();
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        GestureLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == key)
            .ok_or_else(|| anyhow!("unknown gesture label '{}'", s))
    }
}
