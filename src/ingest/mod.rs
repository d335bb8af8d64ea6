//! Landmark ingestion sources.
//!
//! Hand and face landmarks come from an external tracker. A source yields
//! one `LandmarkFrame` per captured video frame:
//! - JSON lines from a file or stdin (`JsonlSource`)
//! - a scripted sequence of synthetic poses (`ScriptedSource`, `stub://demo`)
//!
//! Sources never classify. They hand frames to the pipeline, which publishes
//! face results to a `FaceSlot` and snapshots them per frame.

pub mod face_slot;
mod jsonl;
mod scripted;
pub mod synthetic;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::landmarks::{FaceLandmarks, HandSet};

pub use face_slot::FaceSlot;
pub use jsonl::JsonlSource;
pub use scripted::ScriptedSource;

/// What the face detector reported alongside a frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FaceUpdate {
    /// No new face result; the previous one stays current.
    #[default]
    Unchanged,
    Detected(FaceLandmarks),
    /// The detector ran and found no face.
    Lost,
}

/// One frame of tracker output.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    /// Monotonic frame index.
    pub seq: u64,
    pub hands: HandSet,
    pub face: FaceUpdate,
    /// Frame the face result was computed for, if it lags the hands.
    pub face_frame: Option<u64>,
}

impl LandmarkFrame {
    pub fn new(seq: u64, hands: HandSet, face: FaceUpdate) -> Self {
        Self {
            seq,
            hands,
            face,
            face_frame: None,
        }
    }

    /// Frame index to publish the face update under.
    pub fn face_seq(&self) -> u64 {
        self.face_frame.unwrap_or(self.seq)
    }
}

/// Statistics for a landmark source.
#[derive(Clone, Debug, Default)]
pub struct SourceStats {
    pub name: String,
    pub frames_read: u64,
    pub lines_skipped: u64,
}

/// A producer of landmark frames.
pub trait LandmarkSource {
    /// Human-readable source identifier (path, `stdin`, `stub://demo`).
    fn name(&self) -> &str;

    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>>;

    fn stats(&self) -> SourceStats;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        (**self).next_frame()
    }

    fn stats(&self) -> SourceStats {
        (**self).stats()
    }
}

/// Open a source by URI: `-` for stdin, `stub://demo` for the scripted demo,
/// anything else is a local JSON-lines file.
pub fn open_source(uri: &str) -> Result<Box<dyn LandmarkSource>> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(anyhow!("landmark source must not be empty"));
    }
    if uri == "-" {
        let stdin = std::io::stdin().lock();
        return Ok(Box::new(JsonlSource::new("stdin", stdin)));
    }
    if let Some(name) = uri.strip_prefix("stub://") {
        return match name {
            "demo" => Ok(Box::new(ScriptedSource::demo())),
            other => Err(anyhow!("unknown stub source: stub://{}", other)),
        };
    }
    if uri.contains("://") {
        return Err(anyhow!(
            "landmark sources must be local paths, '-' or stub:// (got {})",
            uri
        ));
    }
    Ok(Box::new(JsonlSource::open(Path::new(uri))?))
}

impl JsonlSource<BufReader<File>> {
    /// Open a JSON-lines file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open landmark file {}", path.display()))?;
        Ok(JsonlSource::new(
            path.display().to_string(),
            BufReader::new(file),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_source_rejects_urls_and_unknown_stubs() {
        assert!(open_source("").is_err());
        assert!(open_source("rtsp://camera/stream").is_err());
        assert!(open_source("stub://nope").is_err());
        assert!(open_source("/definitely/not/here.jsonl").is_err());
    }

    #[test]
    fn open_source_stub_demo_yields_frames() {
        let mut source = open_source("stub://demo").unwrap();
        assert_eq!(source.name(), "stub://demo");
        assert!(source.next_frame().unwrap().is_some());
    }

    #[test]
    fn face_seq_defaults_to_frame_index() {
        let mut frame = LandmarkFrame::new(7, HandSet::empty(), FaceUpdate::Lost);
        assert_eq!(frame.face_seq(), 7);
        frame.face_frame = Some(5);
        assert_eq!(frame.face_seq(), 5);
    }
}
