//! The SeasonDepth adapter the training framework calls into.

use image::DynamicImage;

use crate::config::SeasonDepthConfig;
use crate::depth::{decode_depth, flip_horizontal, resize_nearest};
use crate::intrinsics::Intrinsics;
use crate::layout::LayoutResolver;
use crate::loader::{ImageLoader, RgbLoader};
use crate::types::{
    DatasetResult, DepthMap, ResolvedPaths, SampleRef, SeasonDepthError, Side, FULL_RES_SHAPE,
};

/// Resolves and loads SeasonDepth samples.
///
/// Everything here is fixed at construction, so a dataset can be shared
/// across worker threads without locking.
#[derive(Debug)]
pub struct SeasonDepthDataset<L = RgbLoader> {
    layout: LayoutResolver,
    loader: L,
    filenames: Vec<SampleRef>,
    intrinsics: Intrinsics,
    full_res_shape: (u32, u32),
    /// Ground-truth availability, judged once from the first sample.
    load_depth: bool,
}

impl SeasonDepthDataset<RgbLoader> {
    pub fn new(cfg: &SeasonDepthConfig, filenames: Vec<SampleRef>) -> Self {
        Self::with_loader(cfg, filenames, RgbLoader)
    }
}

impl<L: ImageLoader> SeasonDepthDataset<L> {
    pub fn with_loader(cfg: &SeasonDepthConfig, filenames: Vec<SampleRef>, loader: L) -> Self {
        log::info!(
            "season-depth dataset: {} samples under {} (camera {:?}, val color {:?})",
            filenames.len(),
            cfg.root.display(),
            cfg.camera,
            cfg.val_color_layout
        );
        let mut dataset = Self {
            layout: LayoutResolver::from_config(cfg),
            loader,
            filenames,
            intrinsics: Intrinsics::for_camera(cfg.camera),
            full_res_shape: FULL_RES_SHAPE,
            load_depth: false,
        };
        dataset.load_depth = dataset.check_depth().unwrap_or_else(|e| {
            log::warn!("season-depth dataset: cannot check ground truth ({e}); depth disabled");
            false
        });
        dataset
    }

    /// Whether `load_sample` returns depth; fixed at construction.
    pub fn load_depth(&self) -> bool {
        self.load_depth
    }

    pub fn layout(&self) -> &LayoutResolver {
        &self.layout
    }

    pub fn filenames(&self) -> &[SampleRef] {
        &self.filenames
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }

    /// Normalized intrinsics; identical for every sample.
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    /// (width, height) depth maps are resized to.
    pub fn full_res_shape(&self) -> (u32, u32) {
        self.full_res_shape
    }

    pub fn resolve(&self, folder: &str) -> DatasetResult<ResolvedPaths> {
        self.layout.resolve(folder)
    }

    /// Whether ground truth exists, judged from the first sample only.
    pub fn check_depth(&self) -> DatasetResult<bool> {
        let Some(first) = self.filenames.first() else {
            log::warn!("season-depth dataset has no samples; treating it as inference-only");
            return Ok(false);
        };
        self.layout.has_ground_truth(&first.folder)
    }

    /// True when the split has no depth maps and can only be used for inference.
    pub fn is_inference_only(&self) -> DatasetResult<bool> {
        Ok(!self.check_depth()?)
    }

    /// `side` is accepted for interface parity; it never changes the path.
    pub fn get_color(
        &self,
        folder: &str,
        _side: Option<Side>,
        do_flip: bool,
    ) -> DatasetResult<DynamicImage> {
        let path = self.layout.color_path(folder)?;
        let color = self.loader.load(&path)?;
        Ok(if do_flip { color.fliph() } else { color })
    }

    /// Raw depth at full resolution, shape (768, 1024).
    pub fn get_depth(
        &self,
        folder: &str,
        _side: Option<Side>,
        do_flip: bool,
    ) -> DatasetResult<DepthMap> {
        let path = self.layout.depth_path(folder)?;
        let raw = decode_depth(&path)?;
        let (width, height) = self.full_res_shape;
        let mut depth = resize_nearest(&raw, width, height);
        if do_flip {
            flip_horizontal(&mut depth);
        }
        Ok(depth)
    }

    /// Color for the `index`-th entry, plus depth when the split has ground truth.
    ///
    /// In a ground-truth split a missing depth map is an error, not `None`.
    pub fn load_sample(
        &self,
        index: usize,
        do_flip: bool,
    ) -> DatasetResult<(DynamicImage, Option<DepthMap>)> {
        let entry = self
            .filenames
            .get(index)
            .ok_or(SeasonDepthError::IndexOutOfRange {
                index,
                len: self.filenames.len(),
            })?;
        let color = self.get_color(&entry.folder, entry.side, do_flip)?;
        let depth = if self.load_depth {
            Some(self.get_depth(&entry.folder, entry.side, do_flip)?)
        } else {
            None
        };
        Ok((color, depth))
    }
}
