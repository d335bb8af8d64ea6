use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::landmarks::face;
use crate::GestureLabel;

const DEFAULT_ASSETS_DIR: &str = "images";

pub const ENV_CONFIG: &str = "GESTURE_CONFIG";
pub const ENV_ASSETS_DIR: &str = "GESTURE_ASSETS_DIR";
pub const ENV_RIGHT_MOUTH_CORNER: &str = "GESTURE_RIGHT_MOUTH_CORNER";
pub const ENV_MOUTH_HEIGHT_MIN: &str = "GESTURE_MOUTH_HEIGHT_MIN";
pub const ENV_MOUTH_WIDTH_MIN: &str = "GESTURE_MOUTH_WIDTH_MIN";

/// Default media file per label.
pub fn default_asset_file(label: GestureLabel) -> &'static str {
    match label {
        GestureLabel::Jijija => "JIJIJA.mp4",
        GestureLabel::Mimimi => "MIMIMI.mp4",
        GestureLabel::Sixseven => "SIXSEVEN.mp4",
        GestureLabel::Cerrao => "CERRAO.mp4",
        GestureLabel::Timeout => "open_palm.jpg",
        GestureLabel::Thinking => "thumbs_up.jpg",
        GestureLabel::Peace => "peace.jpg",
        GestureLabel::None => "ok_sign.jpg",
    }
}

#[derive(Debug, Deserialize, Default)]
struct GestureConfigFile {
    thresholds: Option<Thresholds>,
    face: Option<FaceIndicesFile>,
    assets: Option<AssetsConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct FaceIndicesFile {
    upper_lip: Option<usize>,
    lower_lip: Option<usize>,
    left_mouth_corner: Option<usize>,
    right_mouth_corner: Option<usize>,
    chin: Option<usize>,
    chin_bottom: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct AssetsConfigFile {
    dir: Option<PathBuf>,
    files: Option<BTreeMap<String, String>>,
}

/// Mouth-open (laughing) thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouthThresholds {
    /// Minimum |upper lip y - lower lip y|.
    pub height_min: f32,
    /// Minimum |right corner x - left corner x|.
    pub width_min: f32,
}

impl Default for MouthThresholds {
    fn default() -> Self {
        Self {
            height_min: 0.01,
            width_min: 0.005,
        }
    }
}

/// Index-finger-on-chin thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThinkingThresholds {
    /// How far above the upper lip the fingertip may sit.
    pub above_lip_tolerance: f32,
    /// Touch radius around the chin and chin-bottom points.
    pub chin_radius: f32,
    /// Touch radius around the lip points.
    pub lip_radius: f32,
}

impl Default for ThinkingThresholds {
    fn default() -> Self {
        Self {
            above_lip_tolerance: 0.05,
            chin_radius: 0.18,
            lip_radius: 0.16,
        }
    }
}

/// Two-hand T-pose thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutThresholds {
    /// Fingertip y-spread below this reads as horizontal.
    pub horizontal_y_spread_max: f32,
    /// Fingertip x-spread above this reads as horizontal.
    pub horizontal_x_spread_min: f32,
    /// Wrist-to-mean-fingertip y offset above this reads as vertical.
    pub vertical_wrist_offset_min: f32,
    /// Fingertip y-spread above this reads as vertical.
    pub vertical_y_spread_min: f32,
    /// Hand centres further apart than this on either axis never form a T.
    pub center_distance_max: f32,
    /// Contact distance accepted when the horizontal hand is spread out.
    pub contact_distance: f32,
    /// Horizontal hand fingertip x-span required with `contact_distance`.
    pub horizontal_x_span_min: f32,
    /// Contact distance accepted unconditionally.
    pub close_contact_distance: f32,
}

impl Default for TimeoutThresholds {
    fn default() -> Self {
        Self {
            horizontal_y_spread_max: 0.15,
            horizontal_x_spread_min: 0.03,
            vertical_wrist_offset_min: 0.08,
            vertical_y_spread_min: 0.12,
            center_distance_max: 0.3,
            contact_distance: 0.3,
            horizontal_x_span_min: 0.06,
            close_contact_distance: 0.2,
        }
    }
}

/// Two-hand balance-pose thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SixSevenThresholds {
    /// Minimum wrist-to-wrist x distance.
    pub wrist_x_distance_min: f32,
    /// Fingers among index/middle/ring that must be loosely extended per hand.
    pub extended_fingers_min: usize,
}

impl Default for SixSevenThresholds {
    fn default() -> Self {
        Self {
            wrist_x_distance_min: 0.3,
            extended_fingers_min: 2,
        }
    }
}

/// Every tunable constant used by the gesture rules.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub mouth: MouthThresholds,
    pub thinking: ThinkingThresholds,
    pub timeout: TimeoutThresholds,
    pub sixseven: SixSevenThresholds,
}

impl Thresholds {
    fn named_values(&self) -> [(&'static str, f32); 14] {
        [
            ("mouth.height_min", self.mouth.height_min),
            ("mouth.width_min", self.mouth.width_min),
            ("thinking.above_lip_tolerance", self.thinking.above_lip_tolerance),
            ("thinking.chin_radius", self.thinking.chin_radius),
            ("thinking.lip_radius", self.thinking.lip_radius),
            (
                "timeout.horizontal_y_spread_max",
                self.timeout.horizontal_y_spread_max,
            ),
            (
                "timeout.horizontal_x_spread_min",
                self.timeout.horizontal_x_spread_min,
            ),
            (
                "timeout.vertical_wrist_offset_min",
                self.timeout.vertical_wrist_offset_min,
            ),
            (
                "timeout.vertical_y_spread_min",
                self.timeout.vertical_y_spread_min,
            ),
            ("timeout.center_distance_max", self.timeout.center_distance_max),
            ("timeout.contact_distance", self.timeout.contact_distance),
            (
                "timeout.horizontal_x_span_min",
                self.timeout.horizontal_x_span_min,
            ),
            (
                "timeout.close_contact_distance",
                self.timeout.close_contact_distance,
            ),
            (
                "sixseven.wrist_x_distance_min",
                self.sixseven.wrist_x_distance_min,
            ),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.named_values() {
            if !value.is_finite() || value <= 0.0 {
                return Err(anyhow!(
                    "threshold {} must be a finite positive number (got {})",
                    name,
                    value
                ));
            }
        }
        if self.sixseven.extended_fingers_min == 0 || self.sixseven.extended_fingers_min > 3 {
            return Err(anyhow!(
                "threshold sixseven.extended_fingers_min must be between 1 and 3"
            ));
        }
        Ok(())
    }
}

/// Face mesh indices read by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceIndices {
    pub upper_lip: usize,
    pub lower_lip: usize,
    pub left_mouth_corner: usize,
    pub right_mouth_corner: usize,
    pub chin: usize,
    pub chin_bottom: usize,
}

impl Default for FaceIndices {
    fn default() -> Self {
        Self {
            upper_lip: face::UPPER_LIP,
            lower_lip: face::LOWER_LIP,
            left_mouth_corner: face::LEFT_MOUTH_CORNER,
            right_mouth_corner: face::RIGHT_MOUTH_CORNER,
            chin: face::CHIN,
            chin_bottom: face::CHIN_BOTTOM,
        }
    }
}

impl FaceIndices {
    fn from_file(file: FaceIndicesFile) -> Self {
        let defaults = Self::default();
        Self {
            upper_lip: file.upper_lip.unwrap_or(defaults.upper_lip),
            lower_lip: file.lower_lip.unwrap_or(defaults.lower_lip),
            left_mouth_corner: file
                .left_mouth_corner
                .unwrap_or(defaults.left_mouth_corner),
            right_mouth_corner: file
                .right_mouth_corner
                .unwrap_or(defaults.right_mouth_corner),
            chin: file.chin.unwrap_or(defaults.chin),
            chin_bottom: file.chin_bottom.unwrap_or(defaults.chin_bottom),
        }
    }

    fn validate(&self) -> Result<()> {
        let limit = crate::landmarks::FACE_MESH_LANDMARK_COUNT;
        for (name, index) in [
            ("upper_lip", self.upper_lip),
            ("lower_lip", self.lower_lip),
            ("left_mouth_corner", self.left_mouth_corner),
            ("right_mouth_corner", self.right_mouth_corner),
            ("chin", self.chin),
            ("chin_bottom", self.chin_bottom),
        ] {
            if index >= limit {
                return Err(anyhow!(
                    "face index {} = {} is outside the {}-point mesh",
                    name,
                    index,
                    limit
                ));
            }
        }
        if self.left_mouth_corner == self.right_mouth_corner {
            return Err(anyhow!("mouth corners must be distinct landmarks"));
        }
        Ok(())
    }
}

/// Configuration consumed by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassifierConfig {
    pub thresholds: Thresholds,
    pub face: FaceIndices,
}

/// Where each label's media lives.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSettings {
    pub dir: PathBuf,
    pub files: BTreeMap<GestureLabel, String>,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            files: GestureLabel::ALL
                .iter()
                .map(|label| (*label, default_asset_file(*label).to_string()))
                .collect(),
        }
    }
}

impl AssetSettings {
    fn from_file(file: AssetsConfigFile) -> Result<Self> {
        let mut settings = Self::default();
        if let Some(dir) = file.dir {
            settings.dir = dir;
        }
        for (key, name) in file.files.unwrap_or_default() {
            let label: GestureLabel = key.parse().map_err(|e| anyhow!("assets.files: {}", e))?;
            settings.files.insert(label, name);
        }
        Ok(settings)
    }

    /// Full path of the configured file for `label`.
    pub fn path_for(&self, label: GestureLabel) -> Option<PathBuf> {
        self.files.get(&label).map(|name| self.dir.join(name))
    }

    fn validate(&self) -> Result<()> {
        for label in GestureLabel::ALL {
            match self.files.get(&label) {
                Some(name) if !name.trim().is_empty() => {}
                _ => return Err(anyhow!("no asset configured for label {}", label)),
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GestureConfig {
    pub classifier: ClassifierConfig,
    pub assets: AssetSettings,
}

impl GestureConfig {
    /// Defaults, then the file named by `GESTURE_CONFIG`, then env overrides.
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// Like `load`, but an explicit `path` takes precedence over `GESTURE_CONFIG`.
    pub fn load_with(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(ENV_CONFIG)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let file_cfg = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Some(read_config_file(&path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: GestureConfigFile) -> Result<Self> {
        let classifier = ClassifierConfig {
            thresholds: file.thresholds.unwrap_or_default(),
            face: FaceIndices::from_file(file.face.unwrap_or_default()),
        };
        let assets = AssetSettings::from_file(file.assets.unwrap_or_default())?;
        Ok(Self { classifier, assets })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var(ENV_ASSETS_DIR) {
            if !dir.trim().is_empty() {
                self.assets.dir = PathBuf::from(dir);
            }
        }
        if let Ok(index) = std::env::var(ENV_RIGHT_MOUTH_CORNER) {
            self.classifier.face.right_mouth_corner = index.trim().parse().map_err(|_| {
                anyhow!("{} must be a face mesh index", ENV_RIGHT_MOUTH_CORNER)
            })?;
        }
        if let Ok(value) = std::env::var(ENV_MOUTH_HEIGHT_MIN) {
            self.classifier.thresholds.mouth.height_min =
                parse_threshold(ENV_MOUTH_HEIGHT_MIN, &value)?;
        }
        if let Ok(value) = std::env::var(ENV_MOUTH_WIDTH_MIN) {
            self.classifier.thresholds.mouth.width_min =
                parse_threshold(ENV_MOUTH_WIDTH_MIN, &value)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.classifier.thresholds.validate()?;
        self.classifier.face.validate()?;
        self.assets.validate()?;
        Ok(())
    }
}

fn parse_threshold(name: &str, value: &str) -> Result<f32> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow!("{} must be a number", name))
}

fn read_config_file(path: &Path) -> Result<GestureConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let cfg = if is_json {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        toml::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_label() {
        let cfg = GestureConfig::from_file(GestureConfigFile::default()).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.assets.files.len(), GestureLabel::ALL.len());
        assert_eq!(
            cfg.assets.path_for(GestureLabel::None),
            Some(PathBuf::from("images/ok_sign.jpg"))
        );
        assert_eq!(cfg.classifier.face.right_mouth_corner, 291);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let file: GestureConfigFile = toml::from_str(
            r#"
            [thresholds.mouth]
            height_min = 0.02

            [face]
            right_mouth_corner = 84

            [assets.files]
            peace = "v_sign.png"
            "#,
        )
        .unwrap();
        let cfg = GestureConfig::from_file(file).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.classifier.thresholds.mouth.height_min, 0.02);
        assert_eq!(cfg.classifier.thresholds.mouth.width_min, 0.005);
        assert_eq!(cfg.classifier.thresholds.timeout, TimeoutThresholds::default());
        assert_eq!(cfg.classifier.face.right_mouth_corner, 84);
        assert_eq!(cfg.classifier.face.upper_lip, face::UPPER_LIP);
        assert_eq!(cfg.assets.files[&GestureLabel::Peace], "v_sign.png");
        assert_eq!(cfg.assets.files[&GestureLabel::Jijija], "JIJIJA.mp4");
    }

    #[test]
    fn unknown_asset_label_is_rejected() {
        let file: GestureConfigFile = toml::from_str(
            r#"
            [assets.files]
            thumbs = "x.jpg"
            "#,
        )
        .unwrap();
        assert!(GestureConfig::from_file(file).is_err());
    }

    #[test]
    fn non_positive_threshold_fails_validation() {
        let mut thresholds = Thresholds::default();
        thresholds.timeout.contact_distance = 0.0;
        assert!(thresholds.validate().is_err());
        thresholds.timeout.contact_distance = f32::NAN;
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn out_of_mesh_face_index_fails_validation() {
        let indices = FaceIndices {
            chin_bottom: 478,
            ..FaceIndices::default()
        };
        assert!(indices.validate().is_err());
    }
}
