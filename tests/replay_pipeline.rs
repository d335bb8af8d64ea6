use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::NamedTempFile;

use gesture_kernel::config::AssetSettings;
use gesture_kernel::ingest::{open_source, synthetic, JsonlSource, ScriptedSource};
use gesture_kernel::landmarks::face;
use gesture_kernel::{
    AssetCatalog, DisplayController, FaceLandmarks, GestureClassifier, GestureLabel,
    HandLandmarks, LandmarkSource, Pipeline, RecordingPresenter,
};

fn display() -> DisplayController<RecordingPresenter> {
    let settings = AssetSettings {
        dir: PathBuf::from("/nonexistent/gesture/assets"),
        ..AssetSettings::default()
    };
    DisplayController::new(AssetCatalog::from_settings(&settings), RecordingPresenter::new())
}

fn run<S: LandmarkSource>(source: S) -> (Vec<GestureLabel>, Pipeline<S, RecordingPresenter>) {
    let mut pipeline = Pipeline::new(source, GestureClassifier::default(), display());
    let mut labels = Vec::new();
    while let Some(classification) = pipeline.step().expect("step") {
        labels.push(classification.label);
    }
    (labels, pipeline)
}

fn hand_json(hand: &HandLandmarks) -> Value {
    serde_json::to_value(hand.points()).expect("hand json")
}

fn face_json(landmarks: &FaceLandmarks) -> Value {
    let mut map = serde_json::Map::new();
    for index in [
        face::UPPER_LIP,
        face::LOWER_LIP,
        face::LEFT_MOUTH_CORNER,
        face::RIGHT_MOUTH_CORNER,
        face::CHIN,
        face::CHIN_BOTTOM,
    ] {
        if let Some(point) = landmarks.get(index) {
            map.insert(index.to_string(), json!({ "x": point.x, "y": point.y }));
        }
    }
    Value::Object(map)
}

fn capture(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp capture");
    for line in lines {
        std::io::Write::write_all(&mut file, line.as_bytes()).expect("write line");
        std::io::Write::write_all(&mut file, b"\n").expect("write newline");
    }
    file
}

#[test]
fn demo_script_tours_every_gesture() {
    let (labels, pipeline) = run(ScriptedSource::demo());
    let stats = pipeline.stats();

    assert_eq!(stats.frames, 27);
    assert_eq!(labels.len(), 27);
    assert_eq!(stats.frames_with_hands, 18);
    assert_eq!(stats.frames_with_face, 24);
    assert_eq!(stats.label_changes, 8);
    assert_eq!(stats.count(GestureLabel::None), 6);
    for label in GestureLabel::ALL.into_iter().filter(|l| !l.is_none()) {
        assert_eq!(stats.count(label), 3, "{}", label);
    }
    assert_eq!(stats.final_label, GestureLabel::None);

    assert_eq!(
        pipeline.display().presenter().labels(),
        vec![
            GestureLabel::Jijija,
            GestureLabel::Thinking,
            GestureLabel::Cerrao,
            GestureLabel::Peace,
            GestureLabel::Mimimi,
            GestureLabel::Timeout,
            GestureLabel::Sixseven,
            GestureLabel::None,
        ]
    );
}

#[test]
fn replays_jsonl_capture_from_file() {
    let fists = json!([
        hand_json(&synthetic::fist(0.3, 0.5)),
        hand_json(&synthetic::fist(0.7, 0.5))
    ]);
    let lines = vec![
        json!({ "hands": fists, "face": face_json(&synthetic::face(false)) }).to_string(),
        "{oops".to_string(),
        json!({ "hands": fists }).to_string(),
        json!({ "hands": [], "face": face_json(&synthetic::face(true)) }).to_string(),
        json!({ "face": null }).to_string(),
        json!({ "hands": [hand_json(&synthetic::peace_sign(0.5, 0.5))] }).to_string(),
    ];
    let file = capture(&lines);

    let source = open_source(file.path().to_str().expect("utf-8 path")).expect("open capture");
    let (labels, pipeline) = run(source);
    assert_eq!(
        labels,
        vec![
            GestureLabel::Mimimi,
            GestureLabel::Mimimi,
            GestureLabel::Jijija,
            GestureLabel::None,
            GestureLabel::Peace,
        ]
    );

    let stats = pipeline.stats();
    assert_eq!(stats.frames, 5);
    assert_eq!(stats.lines_skipped, 1);
    assert_eq!(stats.label_changes, 4);
    assert_eq!(stats.frames_with_face, 3);
    assert_eq!(stats.final_label, GestureLabel::Peace);
}

#[test]
fn lagging_face_is_applied_only_from_its_frame() {
    let open = face_json(&synthetic::face(true));
    let lines = vec![
        json!({ "frame": 10, "face": open, "face_frame": 12 }).to_string(),
        json!({ "frame": 11 }).to_string(),
        json!({ "frame": 12 }).to_string(),
    ];
    let file = capture(&lines);

    let source = JsonlSource::open(file.path()).expect("open capture");
    let (labels, _) = run(source);
    assert_eq!(
        labels,
        vec![GestureLabel::None, GestureLabel::None, GestureLabel::Jijija]
    );
}

#[test]
fn summary_serializes_with_label_keys() {
    let (_, pipeline) = run(ScriptedSource::demo());
    let value = serde_json::to_value(pipeline.stats()).expect("stats json");
    assert_eq!(value["frames"], 27);
    assert_eq!(value["final_label"], "none");
    assert_eq!(value["per_label"]["sixseven"], 3);
    assert!(value["elapsed_secs"].is_number());
    assert!(value["fps"].is_number());
}
