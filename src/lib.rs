//! Touchpad Skin
//!
//! Decodes multi-touch input on a rectangular touch surface into the state
//! of an N64-style controller, driven by a color-masked skin.

pub mod config;
pub mod geometry;
pub mod input;
pub mod paths;
pub mod replay;
pub mod skin;
