//! Per-frame pointer positions and the raw touch-event intake that fills them

use tracing::trace;

/// Number of pointer ids tracked per surface
pub const MAX_POINTERS: usize = 256;

/// Highest pointer id examined each frame unless configured otherwise
pub const DEFAULT_MAX_PID: usize = 64;

/// Active flag and position of every pointer, indexed by pointer id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerSet {
    active: Vec<bool>,
    x: Vec<i32>,
    y: Vec<i32>,
    max_pid: usize,
}

impl Default for PointerSet {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PID)
    }
}

impl PointerSet {
    /// Empty set whose frames examine ids `0..=max_pid`
    pub fn new(max_pid: usize) -> Self {
        Self {
            active: vec![false; MAX_POINTERS],
            x: vec![-1; MAX_POINTERS],
            y: vec![-1; MAX_POINTERS],
            max_pid: max_pid.min(MAX_POINTERS - 1),
        }
    }

    pub fn max_pid(&self) -> usize {
        self.max_pid
    }

    /// Mark a pointer as touching at `(x, y)`; unknown ids are ignored
    pub fn set(&mut self, id: usize, x: i32, y: i32) {
        if id >= MAX_POINTERS {
            return;
        }
        self.active[id] = true;
        self.x[id] = x;
        self.y[id] = y;
    }

    pub fn release(&mut self, id: usize) {
        if id >= MAX_POINTERS {
            return;
        }
        self.active[id] = false;
        self.x[id] = -1;
        self.y[id] = -1;
    }

    pub fn is_active(&self, id: usize) -> bool {
        self.active.get(id).copied().unwrap_or(false)
    }

    /// Position of an active pointer
    pub fn position(&self, id: usize) -> Option<(i32, i32)> {
        self.is_active(id).then(|| (self.x[id], self.y[id]))
    }
}

/// Turns pointer-down/up/move events into a [`PointerSet`]
///
/// Some surfaces report y growing upward; with `invert_y` set the table
/// stores `pad_height - y` so every position ends up in pad space with y
/// growing downward.
#[derive(Debug, Clone)]
pub struct PointerTable {
    pointers: PointerSet,
    invert_y: Option<i32>,
}

impl PointerTable {
    pub fn new(max_pid: usize) -> Self {
        Self {
            pointers: PointerSet::new(max_pid),
            invert_y: None,
        }
    }

    /// Invert y against `pad_height` for every position event
    pub fn inverted(mut self, pad_height: i32) -> Self {
        self.invert_y = Some(pad_height);
        self
    }

    pub fn pointer_down(&mut self, id: usize) {
        if id >= MAX_POINTERS {
            trace!("Ignoring pointer-down for out-of-range id {}", id);
            return;
        }
        self.pointers.active[id] = true;
    }

    pub fn pointer_up(&mut self, id: usize) {
        self.pointers.release(id);
    }

    pub fn pointer_position(&mut self, id: usize, x: i32, y: i32) {
        let y = match self.invert_y {
            Some(height) => height - y,
            None => y,
        };
        self.pointers.set(id, x, y);
    }

    pub fn pointers(&self) -> &PointerSet {
        &self.pointers
    }
}
