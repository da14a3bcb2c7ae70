pub mod candidate;
pub mod history;
pub mod search;
pub mod selection;
pub mod session;
pub mod state;

pub use candidate::{Activator, Candidate, CandidateSource, NameResolver};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryList};
pub use selection::{Navigate, Selection};
pub use session::{Hit, SearchSession, SessionOptions};
pub use state::{JsonFileStore, MemoryStore, SessionState, SessionStore};
