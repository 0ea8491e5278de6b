//! Core types, error definitions, and data structures for season_depth.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub type DatasetResult<T> = Result<T, SeasonDepthError>;

/// Canonical (width, height) every depth map is resized to.
pub const FULL_RES_SHAPE: (u32, u32) = (1024, 768);

#[derive(Debug, Error)]
pub enum SeasonDepthError {
    #[error("invalid sample key {key:?}: {reason}")]
    InvalidSampleKey { key: String, reason: String },
    #[error("invalid camera side {0:?} (expected one of 2, 3, l, r)")]
    InvalidSide(String),
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },
    #[error("image decode error at {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("unsupported depth pixel layout {color} at {path}")]
    UnsupportedDepthFormat { path: PathBuf, color: String },
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sample index {index} out of range for {len} samples")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid split line {line} in {path}: {msg}")]
    InvalidSplitLine {
        path: PathBuf,
        line: usize,
        msg: String,
    },
}

impl SeasonDepthError {
    pub(crate) fn invalid_key(key: &str, reason: impl Into<String>) -> Self {
        SeasonDepthError::InvalidSampleKey {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Dataset partition, inferred from where the `images` marker sits in a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Val,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
        }
    }
}

/// Legacy stereo selector. SeasonDepth is monocular, so this never changes a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Two,
    Three,
    Left,
    Right,
}

impl Side {
    /// Camera index from the side map: `2`/`l` map to 2, `3`/`r` map to 3.
    pub fn camera_index(&self) -> u8 {
        match self {
            Side::Two | Side::Left => 2,
            Side::Three | Side::Right => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Two => "2",
            Side::Three => "3",
            Side::Left => "l",
            Side::Right => "r",
        }
    }
}

impl FromStr for Side {
    type Err = SeasonDepthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2" => Ok(Side::Two),
            "3" => Ok(Side::Three),
            "l" => Ok(Side::Left),
            "r" => Ok(Side::Right),
            other => Err(SeasonDepthError::InvalidSide(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a split file: `<folder> [<frame_index> <side>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRef {
    pub folder: String,
    pub frame_index: i64,
    pub side: Option<Side>,
}

impl SampleRef {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            frame_index: 0,
            side: None,
        }
    }
}

/// Color and depth locations for one sample key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub split: Split,
    pub color: PathBuf,
    pub depth: PathBuf,
}

/// Raw depth values in row-major order (`data[y * width + x]`).
///
/// Values are the decoded pixel values, widened to `f32` without any
/// normalization; every `u16` is exactly representable.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl DepthMap {
    /// (rows, cols), matching the row-major array convention.
    pub fn shape(&self) -> (usize, usize) {
        (self.height as usize, self.width as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn row(&self, y: u32) -> &[f32] {
        let start = (y * self.width) as usize;
        &self.data[start..start + self.width as usize]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitAudit {
    pub total: usize,
    pub train: usize,
    pub val: usize,
    pub invalid: usize,
    pub missing_color: usize,
    pub missing_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    Pass,
    Warn,
    Fail,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Pass => "pass",
            AuditOutcome::Warn => "warn",
            AuditOutcome::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditThresholds {
    pub max_invalid: Option<usize>,
    pub max_missing: Option<usize>,
    pub max_invalid_ratio: Option<f32>,
    pub max_missing_ratio: Option<f32>,
}

impl AuditThresholds {
    pub fn from_env() -> Self {
        fn parse<T: FromStr>(key: &str) -> Option<T> {
            std::env::var(key).ok()?.parse().ok()
        }
        AuditThresholds {
            max_invalid: parse("SEASON_DEPTH_MAX_INVALID"),
            max_missing: parse("SEASON_DEPTH_MAX_MISSING"),
            max_invalid_ratio: parse("SEASON_DEPTH_MAX_INVALID_RATIO"),
            max_missing_ratio: parse("SEASON_DEPTH_MAX_MISSING_RATIO"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub outcome: AuditOutcome,
    pub reasons: Vec<String>,
    pub has_ground_truth: bool,
    pub audit: SplitAudit,
}
