//! Scripted landmark source (`stub://demo`).
//!
//! Plays back a fixed list of poses. Used by the demo binary path and by
//! tests that need a deterministic stream without a tracker.

use std::collections::VecDeque;

use anyhow::Result;

use super::synthetic;
use super::{FaceUpdate, LandmarkFrame, LandmarkSource, SourceStats};
use crate::landmarks::{HandLandmarks, HandSet};

/// Frames each demo pose is held for.
pub const DEMO_HOLD_FRAMES: usize = 3;

pub struct ScriptedSource {
    name: String,
    frames: VecDeque<LandmarkFrame>,
    frames_read: u64,
}

impl ScriptedSource {
    /// Build a source from `(hands, face)` steps, numbered from frame 0.
    pub fn new(name: impl Into<String>, steps: Vec<(Vec<HandLandmarks>, FaceUpdate)>) -> Self {
        let frames = steps
            .into_iter()
            .enumerate()
            .map(|(seq, (hands, face))| {
                LandmarkFrame::new(seq as u64, HandSet::from_hands(hands), face)
            })
            .collect();
        Self {
            name: name.into(),
            frames,
            frames_read: 0,
        }
    }

    /// A tour of every gesture, each held for `DEMO_HOLD_FRAMES` frames:
    /// none, jijija, thinking, cerrao, peace, mimimi, timeout, sixseven, none.
    ///
    /// The face is published once per pose and left unchanged while held.
    pub fn demo() -> Self {
        let closed = || FaceUpdate::Detected(synthetic::face(false));
        let poses: Vec<(Vec<HandLandmarks>, FaceUpdate)> = vec![
            (vec![], closed()),
            (vec![], FaceUpdate::Detected(synthetic::face(true))),
            (vec![synthetic::index_on_chin()], closed()),
            (vec![synthetic::pointing_up(0.5, 0.5)], FaceUpdate::Unchanged),
            (vec![synthetic::peace_sign(0.5, 0.5)], FaceUpdate::Unchanged),
            (
                vec![synthetic::fist(0.3, 0.5), synthetic::fist(0.7, 0.5)],
                FaceUpdate::Unchanged,
            ),
            (
                vec![synthetic::flat_hand(), synthetic::open_palm(0.45, 0.30)],
                FaceUpdate::Unchanged,
            ),
            (
                vec![synthetic::open_palm(0.30, 0.5), synthetic::open_palm(0.65, 0.5)],
                FaceUpdate::Unchanged,
            ),
            (vec![], FaceUpdate::Lost),
        ];

        let mut steps = Vec::with_capacity(poses.len() * DEMO_HOLD_FRAMES);
        for (hands, face) in poses {
            steps.push((hands.clone(), face));
            for _ in 1..DEMO_HOLD_FRAMES {
                steps.push((hands.clone(), FaceUpdate::Unchanged));
            }
        }
        Self::new("stub://demo", steps)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        let frame = self.frames.pop_front();
        if frame.is_some() {
            self.frames_read += 1;
        }
        Ok(frame)
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            name: self.name.clone(),
            frames_read: self.frames_read,
            lines_skipped: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_holds_each_pose_and_numbers_frames() {
        let mut source = ScriptedSource::demo();
        assert_eq!(source.remaining(), 9 * DEMO_HOLD_FRAMES);

        let mut seqs = Vec::new();
        let mut face_updates = 0;
        while let Some(frame) = source.next_frame().unwrap() {
            seqs.push(frame.seq);
            if frame.face != FaceUpdate::Unchanged {
                face_updates += 1;
            }
        }
        assert_eq!(seqs, (0..(9 * DEMO_HOLD_FRAMES) as u64).collect::<Vec<_>>());
        assert_eq!(face_updates, 4);
        assert_eq!(source.stats().frames_read, (9 * DEMO_HOLD_FRAMES) as u64);
    }
}
