/// Keyboard movement over the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigate {
    Next,
    Previous,
    First,
    Last,
}

/// Highlighted row in a result list of `len` entries.
///
/// Movement clamps at both ends; there is no wraparound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Returns whether the index moved.
    pub fn apply(&mut self, nav: Navigate, len: usize) -> bool {
        let before = self.index;
        match nav {
            Navigate::Next => self.index = self.index.saturating_add(1),
            Navigate::Previous => self.index = self.index.saturating_sub(1),
            Navigate::First => self.index = 0,
            Navigate::Last => self.index = len.saturating_sub(1),
        }
        self.clamp(len);
        self.index != before
    }

    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.index = 0;
        } else if self.index >= len {
            self.index = len - 1;
        }
    }
}
