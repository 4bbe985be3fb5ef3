//! Touch input: pointer intake, per-frame resolution and output sinks
//!
//! A [`TouchPad`] owns the per-surface state between frames (pointer table
//! and analog capture) and drives the stateless [`TouchResolver`] once per
//! input frame against the currently published skin.

pub mod analog;
pub mod capture;
pub mod pointer;
pub mod resolver;
pub mod sink;

use anyhow::Result;

use crate::skin::Skin;

pub use capture::Capture;
pub use pointer::{PointerSet, PointerTable, DEFAULT_MAX_PID, MAX_POINTERS};
pub use resolver::{AuxButtonState, FrameOutput, TouchResolver};
pub use sink::{ControllerSink, JsonLinesSink, TracingSink};

/// One touch surface and the analog capture it carries across frames
#[derive(Debug, Clone)]
pub struct TouchPad {
    resolver: TouchResolver,
    table: PointerTable,
    capture: Capture,
}

impl TouchPad {
    pub fn new(resolver: TouchResolver, table: PointerTable) -> Self {
        Self {
            resolver,
            table,
            capture: Capture::NONE,
        }
    }

    pub fn pointer_down(&mut self, id: usize) {
        self.table.pointer_down(id);
    }

    pub fn pointer_up(&mut self, id: usize) {
        self.table.pointer_up(id);
    }

    pub fn pointer_position(&mut self, id: usize, x: i32, y: i32) {
        self.table.pointer_position(id, x, y);
    }

    pub fn capture(&self) -> Capture {
        self.capture
    }

    /// Resolve the frame and keep the updated capture
    pub fn end_frame(&mut self, skin: &Skin) -> FrameOutput {
        let out = self.resolver.resolve(skin, self.capture, self.table.pointers());
        self.capture = out.capture;
        out
    }

    /// Resolve the frame and hand it to `sink`
    pub fn end_frame_into(&mut self, skin: &Skin, sink: &mut dyn ControllerSink) -> Result<FrameOutput> {
        let out = self.end_frame(skin);
        sink.submit(&out)?;
        Ok(out)
    }
}
