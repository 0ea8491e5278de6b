//! Normalized camera intrinsics for the SeasonDepth cameras.
//!
//! Row 0 is divided by image width and row 1 by image height, so one matrix
//! serves every resolution. The principal point sits close to the image
//! center, which keeps horizontal flip augmentation valid.

use serde::Deserialize;

pub type Mat4 = [[f32; 4]; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraVariant {
    #[default]
    C0,
    C1,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    pub k: Mat4,
}

impl Intrinsics {
    pub fn for_camera(camera: CameraVariant) -> Self {
        let (fx, fy, cx, cy) = match camera {
            CameraVariant::C0 => (0.848626, 1.127686, 0.513616, 0.546930),
            CameraVariant::C1 => (0.852913, 1.141262, 0.516918, 0.517282),
        };
        Self::from_params(fx, fy, cx, cy)
    }

    fn from_params(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self {
            k: [
                [fx, 0.0, cx, 0.0],
                [0.0, fy, cy, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn fx(&self) -> f32 {
        self.k[0][0]
    }
    pub fn fy(&self) -> f32 {
        self.k[1][1]
    }
    pub fn cx(&self) -> f32 {
        self.k[0][2]
    }
    pub fn cy(&self) -> f32 {
        self.k[1][2]
    }

    /// Pixel-unit intrinsics for a `width` x `height` image.
    pub fn scaled(&self, width: u32, height: u32) -> Self {
        let mut k = self.k;
        for v in k[0].iter_mut() {
            *v *= width as f32;
        }
        for v in k[1].iter_mut() {
            *v *= height as f32;
        }
        Self { k }
    }

    /// Pixel-unit intrinsics at pyramid level `scale` (dimensions halved per level).
    ///
    /// Levels of 32 or more shift every dimension to zero.
    pub fn for_scale(&self, width: u32, height: u32, scale: u32) -> Self {
        let shrink = |v: u32| v.checked_shr(scale).unwrap_or(0);
        self.scaled(shrink(width), shrink(height))
    }

    /// Closed-form inverse; valid while fx and fy are non-zero.
    pub fn inverse(&self) -> Mat4 {
        let (fx, fy, cx, cy) = (self.fx(), self.fy(), self.cx(), self.cy());
        [
            [1.0 / fx, 0.0, -cx / fx, 0.0],
            [0.0, 1.0 / fy, -cy / fy, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }
}

impl Default for Intrinsics {
    fn default() -> Self {
        Self::for_camera(CameraVariant::default())
    }
}
