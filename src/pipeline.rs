//! Per-frame glue: source → face slot → classifier → display.
//!
//! One frame is in flight at a time. The face snapshot is taken once per
//! frame and passed to the classifier explicitly; if the source stalls
//! nothing is classified and the displayed label stays where it was.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use crate::classify::{Classification, GestureClassifier};
use crate::display::{DisplayController, Presenter};
use crate::ingest::{FaceSlot, FaceUpdate, LandmarkFrame, LandmarkSource};
use crate::GestureLabel;

/// Run counters, printed as the end-of-run summary.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    pub frames: u64,
    pub frames_with_hands: u64,
    pub frames_with_face: u64,
    pub label_changes: u64,
    pub presenter_errors: u64,
    pub lines_skipped: u64,
    pub final_label: GestureLabel,
    /// Wall-clock seconds from the first frame to the latest one.
    pub elapsed_secs: f64,
    pub fps: f64,
    /// Frames classified as each label. Every label is present.
    pub per_label: BTreeMap<GestureLabel, u64>,
}

impl PipelineStats {
    fn new() -> Self {
        Self {
            per_label: GestureLabel::ALL.into_iter().map(|label| (label, 0)).collect(),
            ..Self::default()
        }
    }

    pub fn count(&self, label: GestureLabel) -> u64 {
        self.per_label.get(&label).copied().unwrap_or(0)
    }
}

pub struct Pipeline<S, P> {
    source: S,
    classifier: GestureClassifier,
    face_slot: FaceSlot,
    display: DisplayController<P>,
    stats: PipelineStats,
    started: Option<Instant>,
    last_seq: Option<u64>,
}

impl<S: LandmarkSource, P: Presenter> Pipeline<S, P> {
    pub fn new(source: S, classifier: GestureClassifier, display: DisplayController<P>) -> Self {
        Self::with_face_slot(source, classifier, display, FaceSlot::new())
    }

    /// Use a face slot shared with a separately scheduled face detector.
    pub fn with_face_slot(
        source: S,
        classifier: GestureClassifier,
        display: DisplayController<P>,
        face_slot: FaceSlot,
    ) -> Self {
        Self {
            source,
            classifier,
            face_slot,
            display,
            stats: PipelineStats::new(),
            started: None,
            last_seq: None,
        }
    }

    /// Process one frame. `Ok(None)` once the source is exhausted.
    pub fn step(&mut self) -> Result<Option<Classification>> {
        let Some(frame) = self.source.next_frame()? else {
            return Ok(None);
        };
        Ok(Some(self.process(frame)))
    }

    /// Process frames until the source runs dry.
    pub fn run(&mut self) -> Result<PipelineStats> {
        while self.step()?.is_some() {}
        Ok(self.stats())
    }

    /// Like `run`, but stops early once `stop` is set. The flag is checked
    /// between frames.
    pub fn run_until(&mut self, stop: &AtomicBool) -> Result<PipelineStats> {
        while !stop.load(Ordering::SeqCst) {
            if self.step()?.is_none() {
                break;
            }
        }
        Ok(self.stats())
    }

    fn process(&mut self, frame: LandmarkFrame) -> Classification {
        self.started.get_or_insert_with(Instant::now);
        if let Some(last) = self.last_seq.replace(frame.seq) {
            if frame.seq < last {
                // Faces kept for the old numbering would shadow every new one.
                log::warn!(
                    "frame sequence went back from {} to {}; clearing face slot",
                    last,
                    frame.seq
                );
                self.face_slot.clear();
            }
        }

        match frame.face {
            FaceUpdate::Unchanged => {}
            FaceUpdate::Detected(ref face) => {
                self.face_slot.publish(frame.face_seq(), Some(face.clone()))
            }
            FaceUpdate::Lost => self.face_slot.publish(frame.face_seq(), None),
        }
        let face = self.face_slot.snapshot_for(frame.seq);
        let classification = self.classifier.explain(&frame.hands, face.as_deref());
        log_metrics(frame.seq, &classification);

        self.stats.frames += 1;
        if !frame.hands.is_empty() {
            self.stats.frames_with_hands += 1;
        }
        if face.is_some() {
            self.stats.frames_with_face += 1;
        }
        *self.stats.per_label.entry(classification.label).or_insert(0) += 1;

        let previous = self.display.current();
        match self.display.update(classification.label) {
            Ok(false) => {}
            Ok(true) => {
                self.stats.label_changes += 1;
                log::info!(
                    "frame {}: gesture {} -> {}",
                    frame.seq,
                    previous,
                    classification.label
                );
            }
            Err(err) => {
                self.stats.label_changes += 1;
                self.stats.presenter_errors += 1;
                log::warn!("frame {}: {:#}", frame.seq, err);
            }
        }
        classification
    }

    pub fn stats(&self) -> PipelineStats {
        let mut stats = self.stats.clone();
        stats.lines_skipped = self.source.stats().lines_skipped;
        stats.final_label = self.display.current();
        if let Some(started) = self.started {
            stats.elapsed_secs = started.elapsed().as_secs_f64();
            if stats.elapsed_secs > 0.0 {
                stats.fps = stats.frames as f64 / stats.elapsed_secs;
            }
        }
        stats
    }

    pub fn face_slot(&self) -> &FaceSlot {
        &self.face_slot
    }

    pub fn display(&self) -> &DisplayController<P> {
        &self.display
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_display(self) -> DisplayController<P> {
        self.display
    }
}

fn log_metrics(seq: u64, classification: &Classification) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    if let Some(mouth) = &classification.mouth {
        log::debug!(
            "frame {}: mouth H {:.3} W {:.3}",
            seq,
            mouth.height,
            mouth.width
        );
    }
    if let Some((first, second)) = &classification.hand_poses {
        log::debug!(
            "frame {}: hand1 H={} V={} hand2 H={} V={} center dist ({:.2}, {:.2})",
            seq,
            first.horizontal,
            first.vertical,
            second.horizontal,
            second.vertical,
            (first.center.x - second.center.x).abs(),
            (first.center.y - second.center.y).abs()
        );
    }
    log::debug!(
        "frame {}: {} via {}",
        seq,
        classification.label,
        classification.rule.unwrap_or("fallback")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetSettings;
    use crate::display::{AssetCatalog, RecordingPresenter};
    use crate::ingest::{synthetic, ScriptedSource, SourceStats};
    use std::path::PathBuf;

    fn display() -> DisplayController<RecordingPresenter> {
        let settings = AssetSettings {
            dir: PathBuf::from("/nonexistent/gesture/assets"),
            ..AssetSettings::default()
        };
        DisplayController::new(AssetCatalog::from_settings(&settings), RecordingPresenter::new())
    }

    #[test]
    fn face_persists_until_lost() {
        let source = ScriptedSource::new(
            "test",
            vec![
                (vec![], FaceUpdate::Detected(synthetic::face(true))),
                (vec![], FaceUpdate::Unchanged),
                (vec![], FaceUpdate::Lost),
                (vec![], FaceUpdate::Unchanged),
            ],
        );
        let mut pipeline = Pipeline::new(source, GestureClassifier::default(), display());
        let labels: Vec<GestureLabel> = std::iter::from_fn(|| pipeline.step().unwrap())
            .map(|c| c.label)
            .collect();
        assert_eq!(
            labels,
            vec![
                GestureLabel::Jijija,
                GestureLabel::Jijija,
                GestureLabel::None,
                GestureLabel::None
            ]
        );

        let stats = pipeline.stats();
        assert_eq!(stats.frames, 4);
        assert_eq!(stats.frames_with_face, 2);
        assert_eq!(stats.label_changes, 2);
        assert_eq!(stats.count(GestureLabel::Jijija), 2);
        assert_eq!(stats.final_label, GestureLabel::None);
    }

    struct Frames(std::vec::IntoIter<LandmarkFrame>);

    impl Frames {
        fn new(frames: Vec<LandmarkFrame>) -> Self {
            Self(frames.into_iter())
        }
    }

    impl LandmarkSource for Frames {
        fn name(&self) -> &str {
            "frames"
        }

        fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
            Ok(self.0.next())
        }

        fn stats(&self) -> SourceStats {
            SourceStats::default()
        }
    }

    fn frame(seq: u64, face: FaceUpdate) -> LandmarkFrame {
        LandmarkFrame::new(seq, Default::default(), face)
    }

    #[test]
    fn face_from_a_later_frame_is_not_used_early() {
        let mut ahead = frame(0, FaceUpdate::Detected(synthetic::face(true)));
        ahead.face_frame = Some(2);

        let mut pipeline = Pipeline::new(
            Frames::new(vec![ahead]),
            GestureClassifier::default(),
            display(),
        );
        let first = pipeline.step().unwrap().unwrap();
        assert_eq!(first.label, GestureLabel::None);
        assert!(pipeline.face_slot().snapshot_for(2).is_some());
    }

    #[test]
    fn restarted_frame_numbers_reset_the_face_slot() {
        let frames = vec![
            frame(40, FaceUpdate::Detected(synthetic::face(false))),
            frame(41, FaceUpdate::Unchanged),
            frame(0, FaceUpdate::Detected(synthetic::face(true))),
            frame(1, FaceUpdate::Unchanged),
        ];
        let mut pipeline =
            Pipeline::new(Frames::new(frames), GestureClassifier::default(), display());
        let labels: Vec<GestureLabel> = std::iter::from_fn(|| pipeline.step().unwrap())
            .map(|c| c.label)
            .collect();
        assert_eq!(
            labels,
            vec![
                GestureLabel::None,
                GestureLabel::None,
                GestureLabel::Jijija,
                GestureLabel::Jijija
            ]
        );
        assert_eq!(pipeline.face_slot().latest_frame(), Some(0));
    }

    #[test]
    fn stats_report_rate_once_frames_arrive() {
        let mut pipeline =
            Pipeline::new(ScriptedSource::demo(), GestureClassifier::default(), display());
        let idle = pipeline.stats();
        assert_eq!(idle.elapsed_secs, 0.0);
        assert_eq!(idle.fps, 0.0);

        let stats = pipeline.run().unwrap();
        assert_eq!(stats.frames, 27);
        assert!(stats.elapsed_secs >= 0.0);
        assert!(stats.fps >= 0.0 && stats.fps.is_finite());
    }

    #[test]
    fn run_until_stops_on_flag() {
        let stop = AtomicBool::new(true);
        let mut pipeline =
            Pipeline::new(ScriptedSource::demo(), GestureClassifier::default(), display());
        let stats = pipeline.run_until(&stop).unwrap();
        assert_eq!(stats.frames, 0);
        assert_eq!(pipeline.source().remaining(), ScriptedSource::demo().remaining());
    }
}
