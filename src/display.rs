//! Label to media display.
//!
//! `AssetCatalog` resolves every label to a media file once at startup,
//! falling back to a coloured placeholder card when the file is missing.
//! `DisplayController` carries the only cross-frame state in the system, the
//! label currently on screen, and hands an asset to its `Presenter` only when
//! that label changes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{default_asset_file, AssetSettings};
use crate::GestureLabel;

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "webm"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    pub fn from_path(path: &Path) -> Self {
        let is_video = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| VIDEO_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)));
        if is_video {
            Self::Video
        } else {
            Self::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
        }
    }
}

/// What actually gets shown for a label.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AssetSource {
    File,
    /// Solid card with the label caption, used when the file is missing.
    Placeholder { rgb: [u8; 3], caption: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Asset {
    pub label: GestureLabel,
    pub path: PathBuf,
    pub kind: MediaKind,
    pub source: AssetSource,
}

impl Asset {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, AssetSource::Placeholder { .. })
    }
}

/// Card colour for a label's placeholder, as RGB: jijija orange, mimimi pink,
/// sixseven dodger blue, cerrao deep pink, timeout yellow, thinking sky blue,
/// peace green, none grey.
pub fn placeholder_rgb(label: GestureLabel) -> [u8; 3] {
    match label {
        GestureLabel::Jijija => [255, 165, 0],
        GestureLabel::Mimimi => [255, 192, 203],
        GestureLabel::Sixseven => [30, 144, 255],
        GestureLabel::Cerrao => [255, 20, 147],
        GestureLabel::Timeout => [255, 255, 0],
        GestureLabel::Thinking => [0, 200, 255],
        GestureLabel::Peace => [0, 200, 0],
        GestureLabel::None => [128, 128, 128],
    }
}

fn placeholder_caption(label: GestureLabel) -> String {
    label.as_str().to_ascii_uppercase().replace('_', " ")
}

/// One resolved asset per label.
#[derive(Clone, Debug)]
pub struct AssetCatalog {
    /// Indexed by `GestureLabel` discriminant, in `GestureLabel::ALL` order.
    assets: Vec<Asset>,
}

impl AssetCatalog {
    pub fn from_settings(settings: &AssetSettings) -> Self {
        let assets = GestureLabel::ALL
            .into_iter()
            .map(|label| {
                let path = settings
                    .path_for(label)
                    .unwrap_or_else(|| settings.dir.join(default_asset_file(label)));
                resolve_asset(label, path)
            })
            .collect::<Vec<_>>();

        let missing: Vec<&str> = assets
            .iter()
            .filter(|asset| asset.is_placeholder())
            .map(|asset| asset.label.as_str())
            .collect();
        if !missing.is_empty() {
            log::warn!(
                "assets missing under {}, using placeholders for: {}",
                settings.dir.display(),
                missing.join(", ")
            );
        }
        Self { assets }
    }

    pub fn resolve(&self, label: GestureLabel) -> &Asset {
        &self.assets[label as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn placeholder_count(&self) -> usize {
        self.assets.iter().filter(|asset| asset.is_placeholder()).count()
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::from_settings(&AssetSettings::default())
    }
}

fn resolve_asset(label: GestureLabel, path: PathBuf) -> Asset {
    let kind = MediaKind::from_path(&path);
    let source = if path.is_file() {
        AssetSource::File
    } else {
        log::debug!("asset for {} not found at {}", label, path.display());
        AssetSource::Placeholder {
            rgb: placeholder_rgb(label),
            caption: placeholder_caption(label),
        }
    };
    Asset {
        label,
        path,
        kind,
        source,
    }
}

/// Receives asset swaps. Implementations render, play, or record.
pub trait Presenter {
    fn present(&mut self, asset: &Asset) -> Result<()>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, asset: &Asset) -> Result<()> {
        (**self).present(asset)
    }
}

/// Presenter that only logs each swap.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, asset: &Asset) -> Result<()> {
        match &asset.source {
            AssetSource::File => log::info!(
                "Gesture: {} -> {} {}",
                asset.label.display_name(),
                asset.kind.as_str(),
                asset.path.display()
            ),
            AssetSource::Placeholder { rgb, caption } => log::info!(
                "Gesture: {} -> placeholder '{}' #{:02x}{:02x}{:02x}",
                asset.label.display_name(),
                caption,
                rgb[0],
                rgb[1],
                rgb[2]
            ),
        }
        Ok(())
    }
}

/// Presenter that remembers every asset it was given.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    shown: Vec<Asset>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> &[Asset] {
        &self.shown
    }

    pub fn labels(&self) -> Vec<GestureLabel> {
        self.shown.iter().map(|asset| asset.label).collect()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, asset: &Asset) -> Result<()> {
        self.shown.push(asset.clone());
        Ok(())
    }
}

/// Swap-on-change display state.
pub struct DisplayController<P> {
    catalog: AssetCatalog,
    presenter: P,
    current: GestureLabel,
    swaps: u64,
}

impl<P: Presenter> DisplayController<P> {
    /// Starts on `none` without presenting anything; call `prime` to show it.
    pub fn new(catalog: AssetCatalog, presenter: P) -> Self {
        Self {
            catalog,
            presenter,
            current: GestureLabel::None,
            swaps: 0,
        }
    }

    /// Present the asset for the current label.
    pub fn prime(&mut self) -> Result<()> {
        let asset = self.catalog.resolve(self.current);
        self.presenter
            .present(asset)
            .with_context(|| format!("failed to present {}", self.current))
    }

    /// Show `label`. Returns whether the display changed.
    ///
    /// The label is committed before presenting, so a presenter failure does
    /// not trigger a retry on every following frame.
    pub fn update(&mut self, label: GestureLabel) -> Result<bool> {
        if label == self.current {
            return Ok(false);
        }
        log::debug!("display: {} -> {}", self.current, label);
        self.current = label;
        self.swaps += 1;
        let asset = self.catalog.resolve(label);
        self.presenter
            .present(asset)
            .with_context(|| format!("failed to present {}", label))?;
        Ok(true)
    }

    pub fn current(&self) -> GestureLabel {
        self.current
    }

    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }
}
