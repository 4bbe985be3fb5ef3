//! Closest-color classification of sampled mask pixels
//!
//! A mask pixel is matched against every known color, the eighteen logical
//! colors first and then the auxiliary (scancode) colors, and the entry with
//! the smallest absolute difference wins. Only a strictly smaller difference
//! displaces the current best, so ties go to the lowest logical id and then
//! the lowest auxiliary index.

use serde::Serialize;

use super::buttons::{LogicalButton, LOGICAL_BUTTON_COUNT};
use super::AuxButton;

/// Color value meaning "no color configured for this entry"
pub const UNDEFINED_COLOR: i32 = -1;

/// Result of classifying one pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MaskMatch {
    Logical(LogicalButton),
    Auxiliary(usize),
}

/// Color table of a skin's logical buttons, indexed by logical id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable(pub [i32; LOGICAL_BUTTON_COUNT]);

impl Default for ColorTable {
    fn default() -> Self {
        Self([UNDEFINED_COLOR; LOGICAL_BUTTON_COUNT])
    }
}

impl ColorTable {
    pub fn set(&mut self, button: LogicalButton, color: i32) {
        self.0[button.id()] = color;
    }

    pub fn get(&self, button: LogicalButton) -> i32 {
        self.0[button.id()]
    }
}

fn difference(a: i32, b: i32) -> i64 {
    (i64::from(a) - i64::from(b)).abs()
}

/// Find the entry whose color is closest to `color`
///
/// Always returns a match: with no auxiliary buttons the best logical entry
/// is chosen even when every logical color is undefined.
pub fn classify(color: i32, logical: &ColorTable, aux: &[AuxButton]) -> MaskMatch {
    let candidates = LogicalButton::ALL
        .iter()
        .map(|&button| (MaskMatch::Logical(button), logical.get(button)))
        .chain(
            aux.iter()
                .enumerate()
                .map(|(index, button)| (MaskMatch::Auxiliary(index), button.color)),
        );

    let mut best = MaskMatch::Logical(LogicalButton::ALL[0]);
    let mut best_diff = i64::MAX;
    for (candidate, entry) in candidates {
        let diff = difference(entry, color);
        if diff < best_diff {
            best = candidate;
            best_diff = diff;
        }
    }
    best
}
