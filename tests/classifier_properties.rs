use gesture_kernel::config::ClassifierConfig;
use gesture_kernel::ingest::synthetic;
use gesture_kernel::landmarks::{face, hand};
use gesture_kernel::{FaceLandmarks, GestureClassifier, GestureLabel, HandLandmarks, HandSet, Point};

fn classify(hands: Vec<HandLandmarks>, face: Option<&FaceLandmarks>) -> GestureLabel {
    let hands = HandSet::from_hands(hands);
    GestureClassifier::default().classify_frame(&hands, face)
}

/// Mouth 0.02 tall and 0.15 wide.
fn laughing_face() -> FaceLandmarks {
    FaceLandmarks::from_sparse([
        (face::UPPER_LIP, Point::new(0.40, 0.40)),
        (face::LOWER_LIP, Point::new(0.40, 0.42)),
        (face::LEFT_MOUTH_CORNER, Point::new(0.30, 0.41)),
        (face::RIGHT_MOUTH_CORNER, Point::new(0.45, 0.41)),
        (face::CHIN, Point::new(0.40, 0.50)),
        (face::CHIN_BOTTOM, Point::new(0.40, 0.54)),
    ])
}

#[test]
fn nothing_in_frame_is_none() {
    assert_eq!(classify(vec![], None), GestureLabel::None);
    let classifier = GestureClassifier::default();
    assert_eq!(
        classifier.classify(None, &HandSet::empty(), None),
        GestureLabel::None
    );
}

#[test]
fn open_mouth_is_jijija_regardless_of_hands() {
    let face = laughing_face();
    assert_eq!(classify(vec![], Some(&face)), GestureLabel::Jijija);
    assert_eq!(
        classify(vec![synthetic::pointing_up(0.5, 0.5)], Some(&face)),
        GestureLabel::Jijija
    );
    assert_eq!(
        classify(vec![synthetic::peace_sign(0.5, 0.5)], Some(&face)),
        GestureLabel::Jijija
    );
    assert_eq!(
        classify(
            vec![synthetic::fist(0.3, 0.5), synthetic::fist(0.7, 0.5)],
            Some(&face)
        ),
        GestureLabel::Jijija
    );
}

#[test]
fn jijija_outranks_cerrao() {
    let hands = vec![synthetic::pointing_up(0.5, 0.5)];
    assert_eq!(classify(hands.clone(), None), GestureLabel::Cerrao);
    assert_eq!(
        classify(hands, Some(&synthetic::face(true))),
        GestureLabel::Jijija
    );
}

#[test]
fn two_fists_are_mimimi_even_with_a_closed_mouth() {
    let face = synthetic::face(false);
    assert_eq!(
        classify(
            vec![synthetic::fist(0.3, 0.5), synthetic::fist(0.7, 0.5)],
            Some(&face)
        ),
        GestureLabel::Mimimi
    );
}

#[test]
fn lone_index_finger_is_cerrao_without_face() {
    assert_eq!(
        classify(vec![synthetic::pointing_up(0.5, 0.5)], None),
        GestureLabel::Cerrao
    );
}

#[test]
fn index_on_chin_is_thinking() {
    let face = synthetic::face(false);
    assert_eq!(
        classify(vec![synthetic::index_on_chin()], Some(&face)),
        GestureLabel::Thinking
    );
}

#[test]
fn index_and_middle_are_peace() {
    assert_eq!(
        classify(vec![synthetic::peace_sign(0.5, 0.5)], None),
        GestureLabel::Peace
    );
    // A third strictly extended finger is not peace.
    assert_eq!(
        classify(vec![synthetic::hand(0.5, 0.5, [true, true, true, false])], None),
        GestureLabel::None
    );
}

#[test]
fn open_hands_wide_apart_are_sixseven() {
    let hands = vec![
        synthetic::open_palm(0.30, 0.5),
        synthetic::open_palm(0.65, 0.5),
    ];
    assert_eq!(classify(hands, None), GestureLabel::Sixseven);

    // Only the ring finger up on each hand: one of three is not enough.
    let weak = vec![
        synthetic::hand(0.30, 0.5, [false, false, true, false]),
        synthetic::hand(0.65, 0.5, [false, false, true, false]),
    ];
    assert_eq!(classify(weak, None), GestureLabel::None);
}

#[test]
fn flat_hand_under_upright_palm_is_timeout() {
    let hands = vec![synthetic::flat_hand(), synthetic::open_palm(0.45, 0.30)];
    assert_eq!(classify(hands, None), GestureLabel::Timeout);
}

#[test]
fn looser_contact_is_timeout_only_when_the_level_hand_is_spread() {
    // Upright wrist about 0.25 from the level palm: inside the loose contact
    // radius, outside the close one.
    let spread = vec![
        synthetic::sideways_hand(0.30, 0.50, 0.09),
        synthetic::open_palm(0.55, 0.465),
    ];
    assert_eq!(classify(spread, None), GestureLabel::Timeout);

    let narrow = vec![
        synthetic::sideways_hand(0.30, 0.50, 0.05),
        synthetic::open_palm(0.55, 0.465),
    ];
    assert_eq!(classify(narrow, None), GestureLabel::None);
}

#[test]
fn classification_is_idempotent() {
    let classifier = GestureClassifier::default();
    let face = synthetic::face(false);
    let cases = vec![
        HandSet::empty(),
        HandSet::from_hands(vec![synthetic::index_on_chin()]),
        HandSet::from_hands(vec![synthetic::flat_hand(), synthetic::open_palm(0.45, 0.30)]),
        HandSet::from_hands(vec![synthetic::open_palm(0.3, 0.5), synthetic::open_palm(0.65, 0.5)]),
    ];
    for hands in &cases {
        let first = classifier.classify_frame(hands, Some(&face));
        for _ in 0..5 {
            assert_eq!(classifier.classify_frame(hands, Some(&face)), first);
        }
        assert_eq!(classifier.explain(hands, Some(&face)).label, first);
    }
}

#[test]
fn partial_landmarks_never_panic() {
    let classifier = GestureClassifier::default();
    let sparse_face = FaceLandmarks::from_sparse([(face::UPPER_LIP, Point::new(0.5, 0.5))]);

    for len in [0usize, 1, 5, 9, 13, 17, 20] {
        let short = HandLandmarks::from_points(vec![Point::new(0.5, 0.5); len]);
        for hands in [
            vec![short.clone()],
            vec![short.clone(), short.clone()],
            vec![short.clone(), synthetic::open_palm(0.7, 0.5)],
            vec![synthetic::open_palm(0.3, 0.5), short.clone()],
        ] {
            let set = HandSet::from_hands(hands);
            for face in [None, Some(&sparse_face), Some(&FaceLandmarks::default())] {
                let _ = classifier.classify_frame(&set, face);
                let _ = classifier.explain(&set, face);
            }
        }
    }
}

#[test]
fn truncated_hand_skips_only_the_rules_it_cannot_feed() {
    // Index finger complete, everything past the ring MCP missing.
    let mut points = synthetic::pointing_up(0.5, 0.5).points().to_vec();
    points.truncate(hand::RING_MCP);
    let short = HandLandmarks::from_points(points);
    assert_eq!(classify(vec![short], None), GestureLabel::None);
}

#[test]
fn right_mouth_corner_is_configurable() {
    // Corner 291 missing: the default config cannot measure the mouth.
    let face = laughing_face();
    let corner = face.get(face::RIGHT_MOUTH_CORNER).unwrap();
    let face_without_291 = FaceLandmarks::from_sparse(
        [
            face::UPPER_LIP,
            face::LOWER_LIP,
            face::LEFT_MOUTH_CORNER,
            face::CHIN,
            face::CHIN_BOTTOM,
        ]
        .into_iter()
        .map(|index| (index, face.get(index).unwrap())),
    );
    assert_eq!(classify(vec![], Some(&face_without_291)), GestureLabel::None);

    let mut config = ClassifierConfig::default();
    config.face.right_mouth_corner = 84;
    let classifier = GestureClassifier::new(config);
    let mut only_84 = face_without_291.clone();
    only_84.insert(84, corner);
    assert_eq!(
        classifier.classify_frame(&HandSet::empty(), Some(&only_84)),
        GestureLabel::Jijija
    );
}
