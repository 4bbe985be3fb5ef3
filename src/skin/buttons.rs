//! Logical N64 button identifiers
//!
//! The first fourteen ids are the physical buttons of the virtual gamepad,
//! in the slot order the emulator core expects:
//!
//! ```text
//!  0 Right   1 Left    2 Down    3 Up
//!  4 Start   5 Z       6 B       7 A
//!  8 CRight  9 CLeft  10 CDown  11 CUp
//! 12 R      13 L
//! ```
//!
//! Ids 14..=17 are synthetic diagonals. They have a color of their own in
//! the skin but press two cardinal directions instead of an output slot.

use serde::Serialize;

/// Number of physical output slots
pub const PHYSICAL_BUTTON_COUNT: usize = 14;

/// Number of logical ids with a mask color (physical + diagonals)
pub const LOGICAL_BUTTON_COUNT: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum LogicalButton {
    Right = 0,
    Left = 1,
    Down = 2,
    Up = 3,
    Start = 4,
    Z = 5,
    B = 6,
    A = 7,
    CRight = 8,
    CLeft = 9,
    CDown = 10,
    CUp = 11,
    R = 12,
    L = 13,
    UpRight = 14,
    RightDown = 15,
    LeftDown = 16,
    LeftUp = 17,
}

impl LogicalButton {
    /// All logical buttons, in id order
    pub const ALL: [LogicalButton; LOGICAL_BUTTON_COUNT] = [
        LogicalButton::Right,
        LogicalButton::Left,
        LogicalButton::Down,
        LogicalButton::Up,
        LogicalButton::Start,
        LogicalButton::Z,
        LogicalButton::B,
        LogicalButton::A,
        LogicalButton::CRight,
        LogicalButton::CLeft,
        LogicalButton::CDown,
        LogicalButton::CUp,
        LogicalButton::R,
        LogicalButton::L,
        LogicalButton::UpRight,
        LogicalButton::RightDown,
        LogicalButton::LeftDown,
        LogicalButton::LeftUp,
    ];

    pub fn id(self) -> usize {
        self as usize
    }

    /// Parse a `[MASK_COLOR]` key (already lowercased)
    pub fn from_mask_key(key: &str) -> Option<Self> {
        let button = match key {
            "right" => LogicalButton::Right,
            "left" => LogicalButton::Left,
            "down" => LogicalButton::Down,
            "up" => LogicalButton::Up,
            "start" => LogicalButton::Start,
            "z" => LogicalButton::Z,
            "b" => LogicalButton::B,
            "a" => LogicalButton::A,
            "cright" => LogicalButton::CRight,
            "cleft" => LogicalButton::CLeft,
            "cdown" => LogicalButton::CDown,
            "cup" => LogicalButton::CUp,
            "r" => LogicalButton::R,
            "l" => LogicalButton::L,
            "upright" => LogicalButton::UpRight,
            "rightdown" => LogicalButton::RightDown,
            "leftdown" => LogicalButton::LeftDown,
            "leftup" => LogicalButton::LeftUp,
            _ => return None,
        };
        Some(button)
    }

    pub fn name(self) -> &'static str {
        match self {
            LogicalButton::Right => "right",
            LogicalButton::Left => "left",
            LogicalButton::Down => "down",
            LogicalButton::Up => "up",
            LogicalButton::Start => "start",
            LogicalButton::Z => "z",
            LogicalButton::B => "b",
            LogicalButton::A => "a",
            LogicalButton::CRight => "cright",
            LogicalButton::CLeft => "cleft",
            LogicalButton::CDown => "cdown",
            LogicalButton::CUp => "cup",
            LogicalButton::R => "r",
            LogicalButton::L => "l",
            LogicalButton::UpRight => "upright",
            LogicalButton::RightDown => "rightdown",
            LogicalButton::LeftDown => "leftdown",
            LogicalButton::LeftUp => "leftup",
        }
    }

    pub fn is_diagonal(self) -> bool {
        self.id() >= PHYSICAL_BUTTON_COUNT
    }

    /// Decode into the physical output slots this button presses
    ///
    /// Physical buttons press their own slot; diagonals press both of their
    /// cardinal directions and never a slot of their own.
    pub fn physical_slots(self) -> &'static [LogicalButton] {
        match self {
            LogicalButton::UpRight => &[LogicalButton::Up, LogicalButton::Right],
            LogicalButton::RightDown => &[LogicalButton::Right, LogicalButton::Down],
            LogicalButton::LeftDown => &[LogicalButton::Left, LogicalButton::Down],
            LogicalButton::LeftUp => &[LogicalButton::Left, LogicalButton::Up],
            _ => &SLOTS[self.id()..=self.id()],
        }
    }
}

static SLOTS: [LogicalButton; LOGICAL_BUTTON_COUNT] = LogicalButton::ALL;

/// Pressed state of the fourteen physical output slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ButtonStates(pub [bool; PHYSICAL_BUTTON_COUNT]);

impl ButtonStates {
    /// Press every physical slot behind `button`
    pub fn press(&mut self, button: LogicalButton) {
        for slot in button.physical_slots() {
            self.0[slot.id()] = true;
        }
    }

    pub fn is_pressed(&self, button: LogicalButton) -> bool {
        !button.is_diagonal() && self.0[button.id()]
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|&p| p)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}
