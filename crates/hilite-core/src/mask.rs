//! Slice masks and the silhouettes derived from them.
//!
//! A [`SliceMask`] is the footprint of an object at its central slice,
//! covering the object's in-plane extent. Non-zero pixels belong to the
//! object; label masks work unchanged since only zero/non-zero matters.

use std::sync::Arc;

use image::{GrayImage, Luma};

use crate::error::{HiliteError, Result};

/// Pixel value used for set pixels in derived silhouettes.
pub const SILHOUETTE_ON: u8 = 255;

/// Largest block edge [`SliceMask::solid`] will synthesize, in pixels.
pub const MAX_SOLID_EDGE: u32 = 1024;

/// A 2D binary or label footprint of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceMask {
    image: GrayImage,
}

impl SliceMask {
    /// Creates a mask from row-major pixel data.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        let actual = data.len();
        if actual != expected {
            return Err(HiliteError::SizeMismatch { expected, actual });
        }
        let image = GrayImage::from_raw(width, height, data)
            .ok_or(HiliteError::SizeMismatch { expected, actual })?;
        Ok(Self { image })
    }

    /// Wraps an existing grayscale image.
    #[must_use]
    pub fn from_image(image: GrayImage) -> Self {
        Self { image }
    }

    /// Synthesizes a rectangular footprint for detections without a mask.
    ///
    /// The block fills `width x height` pixels and is surrounded by a
    /// one-pixel empty border, so the derived outline traces the block edge.
    /// Each edge is clamped to `1..=MAX_SOLID_EDGE`.
    #[must_use]
    pub fn solid(width: u32, height: u32) -> Self {
        let width = width.clamp(1, MAX_SOLID_EDGE);
        let height = height.clamp(1, MAX_SOLID_EDGE);
        let image = GrayImage::from_fn(
            width.saturating_add(2),
            height.saturating_add(2),
            |x, y| {
                let inside = x >= 1 && y >= 1 && x <= width && y <= height;
                Luma([if inside { SILHOUETTE_ON } else { 0 }])
            },
        );
        Self { image }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns whether the pixel at `(x, y)` belongs to the object.
    ///
    /// Out-of-bounds pixels are reported as unset.
    #[must_use]
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height() && self.image.get_pixel(x, y).0[0] != 0
    }

    /// Returns the number of set pixels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] != 0).count()
    }

    /// Returns the underlying image.
    #[must_use]
    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    /// Derives the outline and filled silhouettes of this mask.
    #[must_use]
    pub fn silhouettes(&self) -> Silhouettes {
        Silhouettes {
            outline: Arc::new(self.outline()),
            filled: Arc::new(self.filled()),
        }
    }

    /// Every set pixel, normalized to [`SILHOUETTE_ON`].
    fn filled(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            Luma([if self.is_set(x, y) { SILHOUETTE_ON } else { 0 }])
        })
    }

    /// Set pixels with at least one unset 4-neighbour.
    ///
    /// Only the interior is scanned; the one-pixel border stays empty.
    fn outline(&self) -> GrayImage {
        let (width, height) = (self.width(), self.height());
        let mut out = GrayImage::new(width, height);
        if width < 3 || height < 3 {
            return out;
        }

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                if !self.is_set(x, y) {
                    continue;
                }
                let edge = !self.is_set(x - 1, y)
                    || !self.is_set(x + 1, y)
                    || !self.is_set(x, y - 1)
                    || !self.is_set(x, y + 1);
                if edge {
                    out.put_pixel(x, y, Luma([SILHOUETTE_ON]));
                }
            }
        }
        out
    }
}

/// Silhouettes derived once from a [`SliceMask`].
///
/// Shared by reference with the visuals that display them.
#[derive(Debug, Clone)]
pub struct Silhouettes {
    pub outline: Arc<GrayImage>,
    pub filled: Arc<GrayImage>,
}
