//! Touch trace replay
//!
//! Replays a recorded CSV trace (`frame,event,pointer,x,y`) through a
//! [`TouchPad`]. Rows sharing a frame number are applied in order, then the
//! frame is resolved against the currently published skin.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::input::{ControllerSink, TouchPad};
use crate::skin::SkinStore;

/// Raw touch event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchEvent {
    Down,
    Up,
    Move,
}

/// One row of a trace file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TraceRow {
    pub frame: u64,
    pub event: TouchEvent,
    pub pointer: usize,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl TraceRow {
    fn apply(&self, pad: &mut TouchPad) {
        match self.event {
            TouchEvent::Down => pad.pointer_down(self.pointer),
            TouchEvent::Up => pad.pointer_up(self.pointer),
            TouchEvent::Move => {
                if let (Some(x), Some(y)) = (self.x, self.y) {
                    pad.pointer_position(self.pointer, x, y);
                }
            }
        }
    }
}

/// A parsed trace, rows in frame order
#[derive(Debug, Clone, Default)]
pub struct Trace {
    rows: Vec<TraceRow>,
}

impl Trace {
    /// Load a trace from a CSV file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read trace file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid trace file: {}", path.display()))
    }

    /// Parse CSV content
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut rows: Vec<TraceRow> = Vec::new();

        for (line, result) in reader.deserialize().enumerate() {
            let row: TraceRow =
                result.with_context(|| format!("Failed to parse trace row {}", line + 1))?;

            if row.event == TouchEvent::Move && (row.x.is_none() || row.y.is_none()) {
                anyhow::bail!("Move event on row {} is missing a coordinate", line + 1);
            }
            if let Some(prev) = rows.last() {
                if row.frame < prev.frame {
                    anyhow::bail!(
                        "Frame {} on row {} comes after frame {}",
                        row.frame,
                        line + 1,
                        prev.frame
                    );
                }
            }
            rows.push(row);
        }

        debug!("Parsed trace with {} events", rows.len());
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replay every frame into `sink`
    ///
    /// The skin is re-read from `store` at each frame so a reload during a
    /// replay takes effect at the next frame boundary.
    ///
    /// # Returns
    /// Number of frames resolved
    pub fn replay(
        &self,
        pad: &mut TouchPad,
        store: &SkinStore,
        sink: &mut dyn ControllerSink,
    ) -> Result<usize> {
        let mut frames = 0;

        for chunk in self.rows.chunk_by(|a, b| a.frame == b.frame) {
            for row in chunk {
                row.apply(pad);
            }

            let skin = store.current();
            pad.end_frame_into(&skin, sink)
                .with_context(|| format!("Failed to emit frame {}", chunk[0].frame))?;
            frames += 1;
        }

        info!("Replayed {} frames", frames);
        Ok(frames)
    }
}
