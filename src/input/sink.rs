//! Destinations for resolved controller state

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use super::resolver::FrameOutput;

/// Receives the controller state produced by every frame
pub trait ControllerSink {
    fn submit(&mut self, frame: &FrameOutput) -> Result<()>;
}

/// Logs each frame that changes the controller state
#[derive(Debug, Default)]
pub struct TracingSink {
    last: Option<FrameOutput>,
}

impl ControllerSink for TracingSink {
    fn submit(&mut self, frame: &FrameOutput) -> Result<()> {
        if self.last.as_ref() == Some(frame) {
            return Ok(());
        }

        let pressed: Vec<usize> = frame
            .buttons
            .as_slice()
            .iter()
            .enumerate()
            .filter_map(|(slot, &p)| p.then_some(slot))
            .collect();
        let scancodes: Vec<u32> = frame
            .aux_buttons
            .iter()
            .filter(|b| b.pressed)
            .map(|b| b.scancode)
            .collect();

        info!(
            "Gamepad: buttons {:?}, stick ({}, {}), scancodes {:?}",
            pressed, frame.axis_x, frame.axis_y, scancodes
        );
        self.last = Some(frame.clone());
        Ok(())
    }
}

/// Writes every frame as one JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
    frame: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, frame: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[derive(serde::Serialize)]
struct FrameLine<'a> {
    frame: u64,
    #[serde(flatten)]
    output: &'a FrameOutput,
}

impl<W: Write> ControllerSink for JsonLinesSink<W> {
    fn submit(&mut self, frame: &FrameOutput) -> Result<()> {
        let line = FrameLine {
            frame: self.frame,
            output: frame,
        };
        serde_json::to_writer(&mut self.writer, &line).context("Failed to serialize frame")?;
        writeln!(self.writer).context("Failed to write frame")?;
        self.frame += 1;
        Ok(())
    }
}
