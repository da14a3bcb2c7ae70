#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    DarkGrey,
    Green,
    Yellow,
    Cyan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub color: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}
