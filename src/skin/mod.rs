//! Touchpad skin model
//!
//! A skin describes the layout of the virtual pad: which mask images sit
//! where, which mask color means which button, auxiliary keyboard buttons,
//! and the optional analog stick zone. Skins are built once by the
//! [`loader`] and never mutated afterwards; a reload builds a fresh skin and
//! swaps it in through the [`store`].

pub mod buttons;
pub mod classify;
pub mod error;
pub mod listing;
pub mod loader;
pub mod mask;
pub mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::ini::PadIni;
use crate::geometry::{Point, Rect};

pub use buttons::{ButtonStates, LogicalButton, PHYSICAL_BUTTON_COUNT};
pub use classify::{classify, ColorTable, MaskMatch};
pub use error::SkinError;
pub use listing::SkinListing;
pub use loader::SkinLoader;
pub use mask::{BitmapMask, MaskSet, MaskSource, PixelMask, SolidMask};
pub use store::SkinStore;

/// Maximum number of button regions, and separately of auxiliary buttons
pub const MAX_BUTTONS: usize = 30;

/// Logical dimensions of the pad every layout is resolved into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PadSize {
    pub width: i32,
    pub height: i32,
}

impl PadSize {
    pub const XPERIA_PLAY: PadSize = PadSize { width: 966, height: 360 };

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Resolve a percentage position into a pad pixel
    pub fn resolve_percent(&self, x_percent: i32, y_percent: i32) -> (i32, i32) {
        let x = (self.width as f32 * (x_percent as f32 / 100.0)) as i32;
        let y = (self.height as f32 * (y_percent as f32 / 100.0)) as i32;
        (x, y)
    }
}

impl Default for PadSize {
    fn default() -> Self {
        Self::XPERIA_PLAY
    }
}

/// Credits from the `[INFO]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkinInfo {
    pub name: String,
    pub version: String,
    pub about: String,
    pub author: String,
}

/// A mask image placed on the pad
#[derive(Debug, Clone)]
pub struct ButtonRegion {
    /// Section the region was declared in
    pub section: String,
    pub bounds: Rect,
    pub mask: Arc<dyn PixelMask>,
}

impl ButtonRegion {
    /// Sample the mask under a pad pixel, or `None` outside the region
    pub fn sample(&self, x: i32, y: i32) -> Option<u32> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let (mx, my) = ((x - self.bounds.x) as u32, (y - self.bounds.y) as u32);
        if mx >= self.mask.width() || my >= self.mask.height() {
            return Some(0);
        }
        Some(self.mask.pixel(mx, my))
    }
}

/// Keyboard button triggered by a mask color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuxButton {
    pub scancode: u32,
    pub color: i32,
}

/// Analog stick zone, all radii in pad pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalogZone {
    pub bounds: Rect,
    pub center: Point,
    pub half_width: f32,
    pub deadzone: f32,
    pub maximum: f32,
    pub padding: f32,
}

impl AnalogZone {
    /// Build a zone from its placed mask rectangle and the configured
    /// `min`, `max` and `buff` percentages of the half-width
    pub fn from_percentages(bounds: Rect, min: f32, max: f32, buff: f32) -> Self {
        let half_width = bounds.width / 2;
        let half_height = bounds.height / 2;
        let radius = |pct: f32| (half_width as f32 * (pct / 100.0)).trunc();

        Self {
            bounds,
            center: Point::new((bounds.x + half_width) as f32, (bounds.y + half_height) as f32),
            half_width: half_width as f32,
            deadzone: radius(min),
            maximum: radius(max),
            padding: radius(buff),
        }
    }

    /// Whether a distance from the center falls in the activation band
    pub fn in_activation_band(&self, distance: f32) -> bool {
        distance >= self.deadzone && distance < self.maximum + self.padding
    }
}

/// A loaded touchpad layout
#[derive(Debug, Clone, Default)]
pub struct Skin {
    pub info: SkinInfo,
    pub pad: PadSize,
    /// Regions in declaration order; the first containing region is hit-tested
    pub regions: Vec<ButtonRegion>,
    pub colors: ColorTable,
    pub aux_buttons: Vec<AuxButton>,
    pub analog: Option<AnalogZone>,
    initialized: bool,
}

impl Skin {
    /// A usable skin with nothing on it ("no skin selected")
    pub fn empty(pad: PadSize) -> Self {
        Self {
            pad,
            initialized: true,
            ..Self::default()
        }
    }

    /// Whether the skin may be used by the resolver
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }
}

/// Provides the section data of a skin by id
pub trait SectionReader {
    fn read_sections(&self, skin: &str) -> std::io::Result<PadIni>;
}

impl SectionReader for PadIni {
    fn read_sections(&self, _skin: &str) -> std::io::Result<PadIni> {
        Ok(self.clone())
    }
}

/// Skins stored on disk as `<root>/<skin>/pad.ini` plus one BMP per section
#[derive(Debug, Clone)]
pub struct SkinDirectory {
    root: PathBuf,
}

impl SkinDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn skin_dir(&self, skin: &str) -> PathBuf {
        self.root.join(skin)
    }

    pub fn pad_ini(&self, skin: &str) -> PathBuf {
        self.skin_dir(skin).join("pad.ini")
    }

    /// Path of the skin listing file next to the skins
    pub fn listing_path(&self) -> PathBuf {
        self.root.join("touchpad_list.ini")
    }
}

impl SectionReader for SkinDirectory {
    fn read_sections(&self, skin: &str) -> std::io::Result<PadIni> {
        PadIni::read(self.pad_ini(skin))
    }
}

impl MaskSource for SkinDirectory {
    fn load_mask(&self, skin: &str, section: &str) -> Result<Arc<dyn PixelMask>> {
        let path = self.skin_dir(skin).join(format!("{}.bmp", section));
        Ok(Arc::new(BitmapMask::open(path)?))
    }
}
