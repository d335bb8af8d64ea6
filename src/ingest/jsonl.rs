//! JSON-lines landmark source.
//!
//! One JSON object per line:
//!
//! ```text
//! {"frame": 12, "hands": [[{"x":0.5,"y":0.4,"z":0.0}, ...21 points]],
//!  "face": [{"x":..,"y":..}, ...] | {"13": {"x":..,"y":..}, ...} | null,
//!  "face_frame": 11}
//! ```
//!
//! All keys are optional. `face` missing means the face detector produced no
//! new result this frame; `face: null` means it ran and lost the face. Blank
//! lines and `#` comments are ignored. Malformed lines are logged and skipped.

use std::collections::BTreeMap;
use std::io::BufRead;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer};

use super::{FaceUpdate, LandmarkFrame, LandmarkSource, SourceStats};
use crate::landmarks::{FaceLandmarks, HandLandmarks, HandSet, Point, HAND_LANDMARK_COUNT};

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    frame: Option<u64>,
    #[serde(default)]
    hands: Vec<Vec<Point>>,
    #[serde(default, deserialize_with = "present")]
    face: Option<Option<FaceRecord>>,
    #[serde(default)]
    face_frame: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FaceRecord {
    Dense(Vec<Point>),
    /// Keyed by landmark index. JSON object keys are strings.
    Sparse(BTreeMap<String, Point>),
}

impl FaceRecord {
    fn into_landmarks(self) -> Result<FaceLandmarks> {
        match self {
            FaceRecord::Dense(points) => Ok(FaceLandmarks::from_dense(points)),
            FaceRecord::Sparse(points) => {
                let points = points
                    .into_iter()
                    .map(|(key, point)| {
                        key.trim()
                            .parse::<usize>()
                            .map(|index| (index, point))
                            .map_err(|_| anyhow!("invalid face landmark index {:?}", key))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(FaceLandmarks::from_sparse(points))
            }
        }
    }
}

/// Distinguishes a `null` field (`Some(None)`) from a missing one (`None`).
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub struct JsonlSource<R> {
    name: String,
    reader: R,
    line_no: u64,
    next_seq: u64,
    frames_read: u64,
    lines_skipped: u64,
}

impl<R: BufRead> JsonlSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            line_no: 0,
            next_seq: 0,
            frames_read: 0,
            lines_skipped: 0,
        }
    }

    fn frame_from_record(&mut self, record: FrameRecord) -> Result<LandmarkFrame> {
        let face = match record.face {
            None => FaceUpdate::Unchanged,
            Some(None) => FaceUpdate::Lost,
            Some(Some(face)) => FaceUpdate::Detected(face.into_landmarks()?),
        };

        let seq = record.frame.unwrap_or(self.next_seq);
        self.next_seq = seq.saturating_add(1);

        let hands = record
            .hands
            .into_iter()
            .enumerate()
            .map(|(i, points)| {
                if points.len() != HAND_LANDMARK_COUNT {
                    log::warn!(
                        "{}:{}: hand {} has {} landmarks, expected {}",
                        self.name,
                        self.line_no,
                        i,
                        points.len(),
                        HAND_LANDMARK_COUNT
                    );
                }
                HandLandmarks::from_points(points)
            })
            .collect();

        Ok(LandmarkFrame {
            seq,
            hands: HandSet::from_hands(hands),
            face,
            face_frame: record.face_frame,
        })
    }
}

impl<R: BufRead> LandmarkSource for JsonlSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("failed to read from {}", self.name))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let parsed = serde_json::from_str::<FrameRecord>(trimmed)
                .map_err(anyhow::Error::from)
                .and_then(|record| self.frame_from_record(record));
            match parsed {
                Ok(frame) => {
                    self.frames_read += 1;
                    return Ok(Some(frame));
                }
                Err(err) => {
                    self.lines_skipped += 1;
                    log::warn!("{}:{}: skipping malformed frame: {}", self.name, self.line_no, err);
                }
            }
        }
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            name: self.name.clone(),
            frames_read: self.frames_read,
            lines_skipped: self.lines_skipped,
        }
    }
}
