//! Adapter configuration: dataset root, validation color layout, camera calibration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::intrinsics::CameraVariant;

const DEFAULT_CONFIG_NAME: &str = "season-depth.toml";
const CONFIG_ENV: &str = "SEASON_DEPTH_CONFIG";
pub const DEFAULT_DATASET_ROOT: &str = "/data0/dataset/SJTU/SeasonDepth";

/// How the validation color path is built.
///
/// `SceneOnly` reproduces the historical `val/images/<scene>/<subscene>` path,
/// which omits the image filename. `WithFilename` appends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValColorLayout {
    #[default]
    SceneOnly,
    WithFilename,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonDepthConfig {
    pub root: PathBuf,
    pub val_color_layout: ValColorLayout,
    pub camera: CameraVariant,
}

impl Default for SeasonDepthConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_DATASET_ROOT),
            val_color_layout: ValColorLayout::default(),
            camera: CameraVariant::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    root: Option<String>,
    val_color_layout: Option<ValColorLayout>,
    camera: Option<CameraVariant>,
}

impl SeasonDepthConfig {
    /// Default config rooted somewhere else; handy for tests and relocated copies.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// `$SEASON_DEPTH_CONFIG`, then `./season-depth.toml`, then defaults.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME));
        let cfg = Self::from_path(&path).unwrap_or_default();
        cfg.warn_if_invalid();
        cfg
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("season-depth config {}: {e}; using defaults", path.display());
                return None;
            }
        };
        Self::from_toml_str(&raw)
            .map_err(|e| {
                log::warn!("season-depth config {}: {e}; using defaults", path.display());
            })
            .ok()
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(raw)?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: ConfigFile) -> Self {
        SeasonDepthConfig {
            root: file
                .root
                .filter(|r| !r.trim().is_empty())
                .map(|r| expand_path(&r))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_ROOT)),
            val_color_layout: file.val_color_layout.unwrap_or_default(),
            camera: file.camera.unwrap_or_default(),
        }
    }

    fn warn_if_invalid(&self) {
        if !self.root.is_absolute() {
            log::warn!(
                "season-depth config: root {} is relative; paths resolve against the working directory",
                self.root.display()
            );
        }
        if self.val_color_layout == ValColorLayout::SceneOnly {
            log::debug!("season-depth config: val color paths omit the image filename (scene_only)");
        }
    }
}

fn expand_path(raw: &str) -> PathBuf {
    let with_home = match (raw.strip_prefix('~'), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => format!("{home}{rest}"),
        _ => raw.to_string(),
    };
    PathBuf::from(expand_env(&with_home))
}

/// Substitute `${VAR}`; unknown variables are left as written.
fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match std::env::var(key) {
                    Ok(val) => out.push_str(&val),
                    Err(_) => out.push_str(&rest[start..start + 3 + end]),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
