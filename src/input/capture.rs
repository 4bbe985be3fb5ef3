//! Analog stick ownership across frames
//!
//! At most one pointer owns the analog stick. It takes ownership the first
//! frame it lands in the activation band and keeps it, even back inside the
//! deadzone, until it lifts off the pad.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capture(Option<usize>);

impl Capture {
    pub const NONE: Capture = Capture(None);

    pub fn owned_by(id: usize) -> Self {
        Capture(Some(id))
    }

    pub fn owner(self) -> Option<usize> {
        self.0
    }

    pub fn is_owner(self, id: usize) -> bool {
        self.0 == Some(id)
    }

    pub fn capture(&mut self, id: usize) {
        self.0 = Some(id);
    }

    pub fn release(&mut self) {
        self.0 = None;
    }
}
