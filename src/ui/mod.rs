pub mod scroll;
pub mod span;
pub mod style;
pub mod view;

pub use span::{Span, SpanLine};
pub use style::{Color, Style};
pub use view::ResultView;
