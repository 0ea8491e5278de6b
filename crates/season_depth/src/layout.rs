//! SeasonDepth on-disk layout: split detection and color/depth path construction.
//!
//! Keys are slash-separated relative paths. The position of the `images`
//! marker decides the split:
//!
//! ```text
//! train: <_>/<loc>/<scene>/<subscene>/images/<file>
//!        -> <root>/train/<loc>/<scene>/<subscene>/images/<file>
//!        -> <root>/train/<loc>/<scene>/<subscene>/depth_map/<stem>.png
//! val:   <_>/images/<scene>/<subscene>/<file>
//!        -> <root>/val/images/<scene>/<subscene>[/<file>]
//!        -> <root>/val/depth/<scene>/<subscene>/<stem>.png
//! ```

use std::path::{Path, PathBuf};

use crate::config::{SeasonDepthConfig, ValColorLayout};
use crate::types::{DatasetResult, ResolvedPaths, SeasonDepthError, Split};

const MARKER: &str = "images";
const DEPTH_EXT: &str = "png";

#[derive(Debug, Clone, Copy)]
enum Segment {
    Lit(&'static str),
    Token(usize),
    /// `stem(token) + ".png"`
    DepthFile(usize),
}

struct SplitRule {
    split: Split,
    marker_at: usize,
    /// Index of the image filename token; keys must reach it.
    file_at: usize,
    color: &'static [Segment],
    depth: &'static [Segment],
}

use Segment::{DepthFile, Lit, Token};

// Train is checked first.
static RULES: [SplitRule; 2] = [
    SplitRule {
        split: Split::Train,
        marker_at: 4,
        file_at: 5,
        color: &[Lit("train"), Token(1), Token(2), Token(3), Lit(MARKER), Token(5)],
        depth: &[Lit("train"), Token(1), Token(2), Token(3), Lit("depth_map"), DepthFile(5)],
    },
    SplitRule {
        split: Split::Val,
        marker_at: 1,
        file_at: 4,
        color: &[Lit("val"), Lit(MARKER), Token(2), Token(3)],
        depth: &[Lit("val"), Lit("depth"), Token(2), Token(3), DepthFile(4)],
    },
];

/// Text before the first `.`; `0005.png` -> `0005`, `a.b.png` -> `a`.
pub fn stem(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

/// Resolves sample keys against a dataset root. Pure string work, no I/O.
#[derive(Debug, Clone)]
pub struct LayoutResolver {
    root: PathBuf,
    val_color_layout: ValColorLayout,
}

impl LayoutResolver {
    pub fn new(root: impl Into<PathBuf>, val_color_layout: ValColorLayout) -> Self {
        Self {
            root: root.into(),
            val_color_layout,
        }
    }

    pub fn from_config(cfg: &SeasonDepthConfig) -> Self {
        Self::new(cfg.root.clone(), cfg.val_color_layout)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn classify(&self, key: &str) -> DatasetResult<Split> {
        let tokens: Vec<&str> = key.split('/').collect();
        Ok(Self::match_rule(key, &tokens)?.split)
    }

    pub fn resolve(&self, key: &str) -> DatasetResult<ResolvedPaths> {
        let tokens: Vec<&str> = key.split('/').collect();
        let rule = Self::match_rule(key, &tokens)?;
        let mut color = self.build(rule.color, &tokens);
        if rule.split == Split::Val && self.val_color_layout == ValColorLayout::WithFilename {
            color.push(tokens[rule.file_at]);
        }
        let depth = self.build(rule.depth, &tokens);
        log::debug!(
            "resolved {key} ({}) -> color {} depth {}",
            rule.split.as_str(),
            color.display(),
            depth.display()
        );
        Ok(ResolvedPaths {
            split: rule.split,
            color,
            depth,
        })
    }

    pub fn color_path(&self, key: &str) -> DatasetResult<PathBuf> {
        self.resolve(key).map(|p| p.color)
    }

    pub fn depth_path(&self, key: &str) -> DatasetResult<PathBuf> {
        self.resolve(key).map(|p| p.depth)
    }

    /// Whether the depth map for `key` exists on disk.
    pub fn has_ground_truth(&self, key: &str) -> DatasetResult<bool> {
        let depth = self.depth_path(key)?;
        Ok(depth.is_file())
    }

    fn match_rule(key: &str, tokens: &[&str]) -> DatasetResult<&'static SplitRule> {
        for rule in RULES.iter() {
            if tokens.get(rule.marker_at) != Some(&MARKER) {
                continue;
            }
            if tokens.len() <= rule.file_at {
                return Err(SeasonDepthError::invalid_key(
                    key,
                    format!(
                        "{} key needs a filename at token {} (got {} tokens)",
                        rule.split.as_str(),
                        rule.file_at,
                        tokens.len()
                    ),
                ));
            }
            return Ok(rule);
        }
        Err(SeasonDepthError::invalid_key(
            key,
            "expected \"images\" at token 4 (train) or token 1 (val)",
        ))
    }

    fn build(&self, segments: &[Segment], tokens: &[&str]) -> PathBuf {
        let mut path = self.root.clone();
        for seg in segments {
            match *seg {
                Lit(s) => path.push(s),
                Token(i) => path.push(tokens[i]),
                DepthFile(i) => path.push(format!("{}.{DEPTH_EXT}", stem(tokens[i]))),
            }
        }
        path
    }
}
