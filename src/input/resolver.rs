//! Per-frame touch resolution
//!
//! Each frame every active pointer is tested against the skin: pointers
//! that do not own the analog stick are hit-tested against the button
//! regions and classified by mask color, and any pointer that owns the
//! stick or lands in its activation band drives the stick axes.
//!
//! The resolver is stateless; the analog [`Capture`] is threaded in and
//! handed back with the frame output.

use serde::Serialize;
use tracing::{debug, trace};

use super::analog::{clamp_to_octagon, stick_axes};
use super::capture::Capture;
use super::pointer::PointerSet;
use crate::skin::{classify, ButtonStates, MaskMatch, Skin};

/// Mask pixels carry color in the low 24 bits
const RGB_MASK: u32 = 0x00FF_FFFF;

/// Pressed state of one auxiliary button, with its scancode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuxButtonState {
    pub scancode: u32,
    pub pressed: bool,
}

/// Everything one frame produces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameOutput {
    pub buttons: ButtonStates,
    pub aux_buttons: Vec<AuxButtonState>,
    pub axis_x: i32,
    pub axis_y: i32,
    pub capture: Capture,
}

impl FrameOutput {
    fn idle(skin: &Skin, capture: Capture) -> Self {
        Self {
            aux_buttons: skin
                .aux_buttons
                .iter()
                .map(|b| AuxButtonState {
                    scancode: b.scancode,
                    pressed: false,
                })
                .collect(),
            capture,
            ..Self::default()
        }
    }

    fn press(&mut self, hit: MaskMatch) {
        match hit {
            MaskMatch::Logical(button) => self.buttons.press(button),
            MaskMatch::Auxiliary(index) => {
                if let Some(state) = self.aux_buttons.get_mut(index) {
                    state.pressed = true;
                }
            }
        }
    }
}

/// Resolver settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchResolver {
    /// Restrict stick travel to an octagonal gate like the N64 controller
    pub octagon: bool,
}

impl TouchResolver {
    pub fn new(octagon: bool) -> Self {
        Self { octagon }
    }

    /// Resolve one frame of pointers against `skin`
    ///
    /// An uninitialized skin produces an idle frame and leaves the capture
    /// untouched.
    pub fn resolve(&self, skin: &Skin, capture: Capture, pointers: &PointerSet) -> FrameOutput {
        if !skin.is_initialized() {
            return FrameOutput::idle(skin, capture);
        }

        let mut out = FrameOutput::idle(skin, capture);
        let mut capture = capture;

        for id in 0..=pointers.max_pid() {
            if capture.is_owner(id) && !pointers.is_active(id) {
                debug!("Pointer {} lifted, releasing analog stick", id);
                capture.release();
            }

            let Some((x, y)) = pointers.position(id) else {
                continue;
            };

            if !capture.is_owner(id) {
                self.hit_buttons(skin, x, y, &mut out);
            }

            let Some(zone) = skin.analog.as_ref() else {
                continue;
            };

            let mut dx = x as f32 - zone.center.x;
            let mut dy = zone.center.y - y as f32;
            let mut distance = dx.hypot(dy);

            if !capture.is_owner(id) && !zone.in_activation_band(distance) {
                continue;
            }

            if self.octagon {
                (dx, dy) = clamp_to_octagon(dx, dy, zone.half_width);
                distance = dx.hypot(dy);
            }

            if !capture.is_owner(id) {
                debug!("Pointer {} captured the analog stick", id);
                capture.capture(id);
            }

            (out.axis_x, out.axis_y) = stick_axes(dx, dy, distance, zone);
        }

        out.capture = capture;
        trace!(
            "Frame resolved: axes ({}, {}), capture {:?}",
            out.axis_x,
            out.axis_y,
            out.capture.owner()
        );
        out
    }

    /// Hit-test the first region containing `(x, y)`
    ///
    /// Only that region is sampled: a black pixel there hides any region
    /// declared after it.
    fn hit_buttons(&self, skin: &Skin, x: i32, y: i32, out: &mut FrameOutput) {
        let Some(pixel) = skin.regions.iter().find_map(|region| region.sample(x, y)) else {
            return;
        };

        let rgb = pixel & RGB_MASK;
        if rgb == 0 {
            return;
        }

        let hit = classify(rgb as i32, &skin.colors, &skin.aux_buttons);
        trace!("Pointer at ({}, {}) sampled {:#08x} -> {:?}", x, y, rgb, hit);
        out.press(hit);
    }
}
