//! Color image loading seam.

use std::fs;
use std::path::Path;

use image::DynamicImage;

use crate::types::{DatasetResult, SeasonDepthError};

/// Decodes a color image from disk. Implementations must hold no mutable
/// state so one loader can be shared by every worker.
pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &Path) -> DatasetResult<DynamicImage>;
}

/// Opens any format `image` understands and converts it to 8-bit RGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbLoader;

impl ImageLoader for RgbLoader {
    fn load(&self, path: &Path) -> DatasetResult<DynamicImage> {
        let img = open_image(path)?;
        Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
    }
}

/// Decode a file, sniffing the format from its contents rather than its extension.
pub(crate) fn open_image(path: &Path) -> DatasetResult<DynamicImage> {
    if !path.is_file() {
        return Err(SeasonDepthError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read(path).map_err(|e| SeasonDepthError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    image::load_from_memory(&raw).map_err(|e| SeasonDepthError::Decode {
        path: path.to_path_buf(),
        source: e,
    })
}

impl<F> ImageLoader for F
where
    F: Fn(&Path) -> DatasetResult<DynamicImage> + Send + Sync,
{
    fn load(&self, path: &Path) -> DatasetResult<DynamicImage> {
        self(path)
    }
}
