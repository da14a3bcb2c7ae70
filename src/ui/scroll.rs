/// Window of at most `height` rows over a longer list, kept around the
/// active row.
#[derive(Debug, Clone)]
pub struct ScrollState {
    offset: usize,
    height: usize,
}

impl ScrollState {
    pub fn new(height: usize) -> Self {
        Self {
            offset: 0,
            height: height.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the window the least distance that brings `active` into view.
    pub fn follow(&mut self, active: usize, total: usize) {
        if total <= self.height {
            self.offset = 0;
            return;
        }
        let active = active.min(total - 1);
        if active < self.offset {
            self.offset = active;
        } else if active >= self.offset + self.height {
            self.offset = active + 1 - self.height;
        }
        self.offset = self.offset.min(total - self.height);
    }

    pub fn window(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(total);
        start..(start + self.height).min(total)
    }
}
