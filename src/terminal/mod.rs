mod input_event;
mod terminal;

pub use input_event::{KeyCode, KeyEvent, KeyModifiers, TerminalEvent};
pub use terminal::Terminal;
