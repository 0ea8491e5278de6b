//! Split file parsing (`<folder> [<frame_index> <side>]` per line).

use std::fs;
use std::path::Path;

use crate::types::{DatasetResult, SampleRef, SeasonDepthError, Side};

pub fn read_split_file(path: &Path) -> DatasetResult<Vec<SampleRef>> {
    let raw = fs::read_to_string(path).map_err(|e| SeasonDepthError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let samples = parse_split_lines(&raw).map_err(|(line, msg)| {
        SeasonDepthError::InvalidSplitLine {
            path: path.to_path_buf(),
            line,
            msg,
        }
    })?;
    log::debug!("read {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Parse split lines; errors carry the 1-based line number.
pub fn parse_split_lines(raw: &str) -> Result<Vec<SampleRef>, (usize, String)> {
    let mut samples = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let sample = match fields.as_slice() {
            [] => continue,
            [folder] => SampleRef::new(*folder),
            [folder, frame, side] => {
                let frame_index = frame
                    .parse::<i64>()
                    .map_err(|e| (i + 1, format!("frame index {frame:?}: {e}")))?;
                let side = side.parse::<Side>().map_err(|e| (i + 1, e.to_string()))?;
                SampleRef {
                    folder: folder.to_string(),
                    frame_index,
                    side: Some(side),
                }
            }
            other => {
                return Err((
                    i + 1,
                    format!("expected 1 or 3 fields, found {}", other.len()),
                ))
            }
        };
        samples.push(sample);
    }
    Ok(samples)
}
