//! Color-mask images behind button regions and the analog zone
//!
//! The resolver never decodes images itself: every region carries a
//! [`PixelMask`] that answers "what color is at this offset". Masks come
//! from a [`MaskSource`]; [`SkinDirectory`](super::SkinDirectory) decodes
//! `<skin>/<section>.bmp` from disk, tests and tools use [`SolidMask`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::RgbImage;

/// A sampled color bitmap
pub trait PixelMask: fmt::Debug + Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Color at `(x, y)`, relative to the mask's top-left corner
    ///
    /// Callers stay in bounds. Any bits above the low 24 are ignored by the
    /// resolver.
    fn pixel(&self, x: u32, y: u32) -> u32;
}

/// Provides the mask for a named section of a skin
pub trait MaskSource {
    fn load_mask(&self, skin: &str, section: &str) -> Result<Arc<dyn PixelMask>>;
}

/// Mask of a single color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidMask {
    pub width: u32,
    pub height: u32,
    pub color: u32,
}

impl SolidMask {
    pub fn new(width: u32, height: u32, color: u32) -> Self {
        Self { width, height, color }
    }
}

impl PixelMask for SolidMask {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, _x: u32, _y: u32) -> u32 {
        self.color
    }
}

/// Decoded bitmap mask
pub struct BitmapMask {
    image: RgbImage,
}

impl BitmapMask {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("Failed to decode mask image: {}", path.display()))?
            .to_rgb8();
        Ok(Self { image })
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }
}

impl fmt::Debug for BitmapMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmapMask")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish()
    }
}

impl PixelMask for BitmapMask {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn pixel(&self, x: u32, y: u32) -> u32 {
        let [r, g, b] = self.image.get_pixel(x, y).0;
        (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }
}

/// In-memory masks keyed by section name, shared by every skin
#[derive(Debug, Default, Clone)]
pub struct MaskSet {
    masks: HashMap<String, Arc<dyn PixelMask>>,
}

impl MaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, section: impl Into<String>, mask: impl PixelMask + 'static) -> Self {
        self.masks.insert(section.into(), Arc::new(mask));
        self
    }
}

impl MaskSource for MaskSet {
    fn load_mask(&self, _skin: &str, section: &str) -> Result<Arc<dyn PixelMask>> {
        self.masks
            .get(section)
            .cloned()
            .with_context(|| format!("No mask registered for section: {}", section))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_bitmap_pixels_pack_as_rgb() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(1, 0, Rgb([0x12, 0x34, 0x56]));
        let mask = BitmapMask::from_image(image);

        assert_eq!(mask.width(), 2);
        assert_eq!(mask.height(), 1);
        assert_eq!(mask.pixel(0, 0), 0);
        assert_eq!(mask.pixel(1, 0), 0x123456);
    }

    #[test]
    fn test_bitmap_round_trips_through_bmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Buttons.bmp");
        let mut image = RgbImage::new(4, 4);
        image.put_pixel(2, 3, Rgb([0xFF, 0x00, 0x00]));
        image.save(&path).unwrap();

        let mask = BitmapMask::open(&path).unwrap();
        assert_eq!(mask.pixel(2, 3), 0xFF0000);
        assert_eq!(mask.pixel(0, 0), 0);
    }

    #[test]
    fn test_mask_set_lookup() {
        let set = MaskSet::new().with("Buttons", SolidMask::new(10, 10, 0xFF));
        assert_eq!(set.load_mask("any", "Buttons").unwrap().pixel(3, 3), 0xFF);
        assert!(set.load_mask("any", "Missing").is_err());
    }
}
