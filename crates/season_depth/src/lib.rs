//! SeasonDepth dataset adapter for monocular depth training.
//!
//! This crate provides utilities for:
//! - Resolving sample keys to color and depth paths for the train and val layouts
//! - Loading color images through an injectable loader
//! - Decoding raw depth maps and resizing them to the canonical 1024x768 grid
//! - Reading split files and auditing a split against the filesystem

pub mod config;
pub mod dataset;
pub mod depth;
pub mod intrinsics;
pub mod layout;
pub mod loader;
pub mod splits;
pub mod types;
pub mod validation;

pub use config::{SeasonDepthConfig, ValColorLayout, DEFAULT_DATASET_ROOT};
pub use dataset::SeasonDepthDataset;
pub use depth::{decode_depth, flip_horizontal, resize_nearest};
pub use intrinsics::{CameraVariant, Intrinsics};
pub use layout::{stem, LayoutResolver};
pub use loader::{ImageLoader, RgbLoader};
pub use splits::{parse_split_lines, read_split_file};
pub use types::*;
pub use validation::{audit, audit_with_thresholds, validate_audit};
