//! Skin loader: `pad.ini` sections + masks -> [`Skin`]
//!
//! Loading builds a complete skin off to the side and only returns it once
//! every field is populated. The returned skin is marked initialized; an
//! error leaves nothing half-built behind for the caller to observe.

use tracing::{debug, warn};

use super::buttons::LogicalButton;
use super::classify::UNDEFINED_COLOR;
use super::{
    AnalogZone, AuxButton, ButtonRegion, MaskSource, PadSize, PixelMask, SectionReader, Skin,
    SkinError, SkinInfo, MAX_BUTTONS,
};
use crate::config::ini::{IniSection, PadIni, SECTIONLESS};
use crate::geometry::{fit_center, Rect};

const INFO_SECTION: &str = "INFO";
const MASK_COLOR_SECTION: &str = "MASK_COLOR";
const SCANCODE_PREFIX: &str = "scancode_";

const DEFAULT_ANALOG_MIN: f32 = 1.0;
const DEFAULT_ANALOG_MAX: f32 = 55.0;
const DEFAULT_ANALOG_BUFF: f32 = 55.0;

fn parse_int(value: Option<&str>, default: i32) -> i32 {
    value
        .and_then(|v| v.trim().parse::<i32>().ok())
        .unwrap_or(default)
}

fn parse_float(value: Option<&str>, default: f32) -> f32 {
    value
        .and_then(|v| v.trim().parse::<f32>().ok())
        .unwrap_or(default)
}

/// Builds skins for a fixed pad size
#[derive(Debug, Clone, Copy, Default)]
pub struct SkinLoader {
    pad: PadSize,
}

impl SkinLoader {
    pub fn new(pad: PadSize) -> Self {
        Self { pad }
    }

    pub fn pad(&self) -> PadSize {
        self.pad
    }

    /// Load the named skin
    ///
    /// `None` means no skin is selected and yields an empty, usable skin.
    ///
    /// # Errors
    /// * [`SkinError::Config`] if the skin's sections cannot be read
    /// * [`SkinError::CapacityExceeded`] if the skin declares more than
    ///   [`MAX_BUTTONS`] regions or auxiliary buttons
    pub fn load<R, M>(&self, skin: Option<&str>, sections: &R, masks: &M) -> Result<Skin, SkinError>
    where
        R: SectionReader + ?Sized,
        M: MaskSource + ?Sized,
    {
        let Some(skin_id) = skin else {
            debug!("No skin selected, using an empty layout");
            return Ok(Skin::empty(self.pad));
        };

        let ini = sections
            .read_sections(skin_id)
            .map_err(|source| SkinError::Config {
                skin: skin_id.to_string(),
                source,
            })?;

        self.build(skin_id, &ini, masks)
    }

    /// Build a skin from already-parsed sections
    pub fn build<M>(&self, skin_id: &str, ini: &PadIni, masks: &M) -> Result<Skin, SkinError>
    where
        M: MaskSource + ?Sized,
    {
        let mut skin = Skin {
            info: read_info(ini),
            pad: self.pad,
            ..Skin::default()
        };

        if let Some(section) = ini.section(MASK_COLOR_SECTION) {
            read_mask_colors(skin_id, section, &mut skin)?;
        }

        for (name, section) in ini.sections() {
            if name == SECTIONLESS || name == INFO_SECTION || name == MASK_COLOR_SECTION {
                continue;
            }

            let Some(kind) = section.get("info") else {
                debug!("Section [{}] has no info key, skipping", name);
                continue;
            };

            if kind.to_lowercase().contains("analog") {
                self.read_analog(skin_id, name, section, masks, &mut skin);
            } else {
                self.read_region(skin_id, name, section, masks, &mut skin)?;
            }
        }

        skin.mark_initialized();
        debug!(
            "Skin '{}' loaded: {} regions, {} aux buttons, analog: {}",
            skin_id,
            skin.regions.len(),
            skin.aux_buttons.len(),
            skin.analog.is_some()
        );
        Ok(skin)
    }

    fn read_region<M>(
        &self,
        skin_id: &str,
        name: &str,
        section: &IniSection,
        masks: &M,
        skin: &mut Skin,
    ) -> Result<(), SkinError>
    where
        M: MaskSource + ?Sized,
    {
        if skin.regions.len() >= MAX_BUTTONS {
            return Err(SkinError::CapacityExceeded {
                skin: skin_id.to_string(),
                kind: "button regions",
                limit: MAX_BUTTONS,
            });
        }

        let mask = match masks.load_mask(skin_id, name) {
            Ok(mask) => mask,
            Err(e) => {
                warn!("Skipping button region [{}]: {:#}", name, e);
                return Ok(());
            }
        };

        let bounds = self.place(section, mask.as_ref());
        debug!(
            "Adding button region {} [{}] placed {:?}",
            skin.regions.len(),
            name,
            bounds
        );

        skin.regions.push(ButtonRegion {
            section: name.to_string(),
            bounds,
            mask,
        });
        Ok(())
    }

    fn read_analog<M>(
        &self,
        skin_id: &str,
        name: &str,
        section: &IniSection,
        masks: &M,
        skin: &mut Skin,
    ) where
        M: MaskSource + ?Sized,
    {
        let mask = match masks.load_mask(skin_id, name) {
            Ok(mask) => mask,
            Err(e) => {
                warn!("Skipping analog zone [{}]: {:#}", name, e);
                return;
            }
        };

        let bounds = self.place(section, mask.as_ref());
        let zone = AnalogZone::from_percentages(
            bounds,
            parse_float(section.get("min"), DEFAULT_ANALOG_MIN),
            parse_float(section.get("max"), DEFAULT_ANALOG_MAX),
            parse_float(section.get("buff"), DEFAULT_ANALOG_BUFF),
        );

        if skin.analog.is_some() {
            warn!("Skin declares more than one analog zone, [{}] replaces the earlier one", name);
        }
        debug!("Analog zone [{}] placed {:?}", name, zone);
        skin.analog = Some(zone);
    }

    /// Center a mask at the section's `x`/`y` percentages, kept on the pad
    fn place(&self, section: &IniSection, mask: &dyn PixelMask) -> Rect {
        let x_percent = parse_int(section.get("x"), 0);
        let y_percent = parse_int(section.get("y"), 0);
        let (cx, cy) = self.pad.resolve_percent(x_percent, y_percent);
        fit_center(
            cx,
            cy,
            mask.width() as i32,
            mask.height() as i32,
            self.pad.bounds(),
        )
    }
}

fn read_info(ini: &PadIni) -> SkinInfo {
    let field = |key: &str| ini.get(INFO_SECTION, key).unwrap_or_default().to_string();
    SkinInfo {
        name: field("name"),
        version: field("version"),
        about: field("about"),
        author: field("author"),
    }
}

fn read_mask_colors(skin_id: &str, section: &IniSection, skin: &mut Skin) -> Result<(), SkinError> {
    for (key, value) in section.iter() {
        let color = parse_int(Some(value), UNDEFINED_COLOR);
        let key = key.to_lowercase();

        if let Some(button) = LogicalButton::from_mask_key(&key) {
            skin.colors.set(button, color);
        } else if let Some(code) = key.strip_prefix(SCANCODE_PREFIX) {
            let Ok(scancode) = code.parse::<u32>() else {
                warn!("Ignoring mask color with invalid scancode: {}", key);
                continue;
            };
            if skin.aux_buttons.len() >= MAX_BUTTONS {
                return Err(SkinError::CapacityExceeded {
                    skin: skin_id.to_string(),
                    kind: "auxiliary buttons",
                    limit: MAX_BUTTONS,
                });
            }
            skin.aux_buttons.push(AuxButton { scancode, color });
        } else {
            debug!("Ignoring unknown mask color key: {}", key);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skin::{MaskSet, SkinDirectory, SolidMask};
    use image::{Rgb, RgbImage};

    const CLASSIC: &str = r#"
[INFO]
name=Classic
version=1.2
author=Pad Author

[MASK_COLOR]
A=16711680
b=65280
UpRight=255
cup=not-a-number
scancode_9=123456
scancode_x=42
select=77

[Buttons]
info=buttons
x=10
y=10

[Stick]
info=Analog
x=50
y=50
min=2
max=50
buff=10

[Notes]
comment=no info key
"#;

    fn masks() -> MaskSet {
        MaskSet::new()
            .with("Buttons", SolidMask::new(100, 60, 0xFF0000))
            .with("Stick", SolidMask::new(200, 200, 0))
    }

    fn load(text: &str) -> Result<Skin, SkinError> {
        SkinLoader::default().build("classic", &PadIni::parse(text), &masks())
    }

    #[test]
    fn test_no_skin_selected_is_empty_and_usable() {
        let skin = SkinLoader::default()
            .load(None, &PadIni::default(), &MaskSet::new())
            .unwrap();
        assert!(skin.is_initialized());
        assert!(skin.regions.is_empty());
        assert!(skin.analog.is_none());
    }

    #[test]
    fn test_info_fields_default_to_empty() {
        let skin = load(CLASSIC).unwrap();
        assert_eq!(skin.info.name, "Classic");
        assert_eq!(skin.info.version, "1.2");
        assert_eq!(skin.info.about, "");
        assert_eq!(skin.info.author, "Pad Author");
    }

    #[test]
    fn test_mask_colors() {
        let skin = load(CLASSIC).unwrap();
        assert_eq!(skin.colors.get(LogicalButton::A), 0xFF0000);
        assert_eq!(skin.colors.get(LogicalButton::B), 0x00FF00);
        assert_eq!(skin.colors.get(LogicalButton::UpRight), 0x0000FF);
        assert_eq!(skin.colors.get(LogicalButton::CUp), UNDEFINED_COLOR);
        assert_eq!(skin.colors.get(LogicalButton::Start), UNDEFINED_COLOR);
    }

    #[test]
    fn test_duplicate_mask_keys_last_wins() {
        let skin = load("[MASK_COLOR]\nA=1\nb=2\na=3\n").unwrap();
        assert_eq!(skin.colors.get(LogicalButton::A), 3);
        assert_eq!(skin.colors.get(LogicalButton::B), 2);
    }

    #[test]
    fn test_oversized_mask_ends_on_pad_edge() {
        let masks = MaskSet::new().with("Buttons", SolidMask::new(968, 364, 0xFF0000));
        let ini = PadIni::parse("[Buttons]\ninfo=buttons\nx=50\ny=50\n");
        let skin = SkinLoader::default().build("wide", &ini, &masks).unwrap();

        assert_eq!(skin.regions[0].bounds, Rect::new(-2, -4, 968, 364));
        assert_eq!(skin.regions[0].sample(0, 0), Some(0xFF0000));
    }

    #[test]
    fn test_bad_scancode_suffix_is_skipped() {
        let skin = load(CLASSIC).unwrap();
        assert_eq!(skin.aux_buttons, vec![AuxButton { scancode: 9, color: 123456 }]);
    }

    #[test]
    fn test_regions_are_resolved_and_fitted() {
        let skin = load(CLASSIC).unwrap();
        assert_eq!(skin.regions.len(), 1);
        // 10% of 966x360 is (96, 36); the 100x60 mask is centered there
        assert_eq!(skin.regions[0].bounds, Rect::new(46, 6, 100, 60));
        assert_eq!(skin.regions[0].section, "Buttons");
    }

    #[test]
    fn test_analog_zone() {
        let skin = load(CLASSIC).unwrap();
        let zone = skin.analog.unwrap();
        assert_eq!(zone.bounds, Rect::new(383, 80, 200, 200));
        assert_eq!(zone.center.x, 483.0);
        assert_eq!(zone.center.y, 180.0);
        assert_eq!(zone.deadzone, 2.0);
        assert_eq!(zone.maximum, 50.0);
        assert_eq!(zone.padding, 10.0);
    }

    #[test]
    fn test_analog_defaults() {
        let text = "[Stick]\ninfo=analog\nx=50\ny=50\n";
        let skin = load(text).unwrap();
        let zone = skin.analog.unwrap();
        assert_eq!(zone.deadzone, 1.0);
        assert_eq!(zone.maximum, 55.0);
        assert_eq!(zone.padding, 55.0);
    }

    #[test]
    fn test_missing_mask_skips_only_that_section() {
        let text = "[Buttons]\ninfo=buttons\n[Ghost]\ninfo=buttons\n";
        let skin = load(text).unwrap();
        assert_eq!(skin.regions.len(), 1);
    }

    #[test]
    fn test_too_many_regions() {
        let mut text = String::new();
        let mut set = MaskSet::new();
        for i in 0..=MAX_BUTTONS {
            text.push_str(&format!("[Region{}]\ninfo=buttons\n", i));
            set = set.with(format!("Region{}", i), SolidMask::new(10, 10, 1));
        }

        let result = SkinLoader::default().build("big", &PadIni::parse(&text), &set);
        assert!(matches!(
            result,
            Err(SkinError::CapacityExceeded { limit: MAX_BUTTONS, .. })
        ));
    }

    #[test]
    fn test_exactly_max_regions_is_fine() {
        let mut text = String::new();
        let mut set = MaskSet::new();
        for i in 0..MAX_BUTTONS {
            text.push_str(&format!("[Region{}]\ninfo=buttons\n", i));
            set = set.with(format!("Region{}", i), SolidMask::new(10, 10, 1));
        }

        let skin = SkinLoader::default()
            .build("full", &PadIni::parse(&text), &set)
            .unwrap();
        assert_eq!(skin.regions.len(), MAX_BUTTONS);
    }

    #[test]
    fn test_too_many_aux_buttons() {
        let mut text = String::from("[MASK_COLOR]\n");
        for i in 0..=MAX_BUTTONS {
            text.push_str(&format!("scancode_{}={}\n", i, i + 1));
        }
        assert!(matches!(
            load(&text),
            Err(SkinError::CapacityExceeded { kind: "auxiliary buttons", .. })
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let root = tempfile::tempdir().unwrap();
        let skin_dir = root.path().join("classic");
        std::fs::create_dir_all(&skin_dir).unwrap();
        std::fs::write(skin_dir.join("pad.ini"), CLASSIC).unwrap();

        let mut image = RgbImage::new(100, 60);
        for pixel in image.pixels_mut() {
            *pixel = Rgb([0xFF, 0, 0]);
        }
        image.save(skin_dir.join("Buttons.bmp")).unwrap();
        RgbImage::new(200, 200).save(skin_dir.join("Stick.bmp")).unwrap();

        let dir = SkinDirectory::new(root.path());
        let skin = SkinLoader::default()
            .load(Some("classic"), &dir, &dir)
            .unwrap();
        assert_eq!(skin.regions.len(), 1);
        assert_eq!(skin.regions[0].sample(50, 10), Some(0xFF0000));
        assert!(skin.analog.is_some());
    }

    #[test]
    fn test_unreadable_skin_is_config_error() {
        let root = tempfile::tempdir().unwrap();
        let dir = SkinDirectory::new(root.path());
        let result = SkinLoader::default().load(Some("missing"), &dir, &dir);
        assert!(matches!(result, Err(SkinError::Config { .. })));
    }
}
