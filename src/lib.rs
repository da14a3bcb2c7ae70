pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod picker;
pub mod terminal;
pub mod ui;

pub use core::candidate;
pub use core::history;
pub use core::search;
pub use core::selection;
pub use core::session;
pub use core::state;

pub use catalog::{FileCatalog, PathActivator};
pub use config::Config;
pub use error::{QuickFindError, Result};
pub use picker::{Picker, PickerOutcome};
