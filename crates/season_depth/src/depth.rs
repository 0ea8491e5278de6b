//! Raw depth map decoding, nearest-neighbour resize, and horizontal flip.

use std::path::Path;

use image::DynamicImage;

use crate::loader::open_image;
use crate::types::{DatasetResult, DepthMap, SeasonDepthError};

/// Decode a single-channel depth raster without touching its values.
///
/// 8-bit and 16-bit grayscale are accepted; anything with color or alpha
/// channels is rejected rather than converted.
pub fn decode_depth(path: &Path) -> DatasetResult<DepthMap> {
    let img = open_image(path)?;
    let (width, height) = (img.width(), img.height());
    let data: Vec<f32> = match img {
        DynamicImage::ImageLuma16(buf) => buf.into_raw().into_iter().map(f32::from).collect(),
        DynamicImage::ImageLuma8(buf) => buf.into_raw().into_iter().map(f32::from).collect(),
        other => {
            return Err(SeasonDepthError::UnsupportedDepthFormat {
                path: path.to_path_buf(),
                color: format!("{:?}", other.color()),
            });
        }
    };
    Ok(DepthMap {
        width,
        height,
        data,
    })
}

/// Nearest-neighbour resize that only copies source values.
///
/// Pixel centers are aligned: destination index `d` samples source coordinate
/// `(d + 0.5) * src / dst - 0.5`, rounded half-up and clamped to the image.
pub fn resize_nearest(src: &DepthMap, width: u32, height: u32) -> DepthMap {
    if src.width == width && src.height == height {
        return src.clone();
    }
    let xs = nearest_indices(src.width, width);
    let ys = nearest_indices(src.height, height);
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for &sy in &ys {
        let row = src.row(sy);
        data.extend(xs.iter().map(|&sx| row[sx as usize]));
    }
    DepthMap {
        width,
        height,
        data,
    }
}

fn nearest_indices(src_len: u32, dst_len: u32) -> Vec<u32> {
    let scale = src_len as f64 / dst_len as f64;
    let last = src_len.saturating_sub(1) as f64;
    (0..dst_len)
        .map(|d| {
            let coord = (d as f64 + 0.5) * scale - 0.5;
            (coord + 0.5).floor().clamp(0.0, last) as u32
        })
        .collect()
}

/// Mirror left-right in place (reverse column order of every row).
pub fn flip_horizontal(depth: &mut DepthMap) {
    let width = depth.width as usize;
    if width == 0 {
        return;
    }
    for row in depth.data.chunks_exact_mut(width) {
        row.reverse();
    }
}
