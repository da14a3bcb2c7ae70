use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An item eligible for ranking.
///
/// `id` is opaque to the search core; only `name` is ever matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Upstream provider of identifiers for a query.
///
/// The source may filter however it likes; the session only re-ranks what it
/// is handed.
pub trait CandidateSource {
    fn candidates(&self, query: &str) -> Result<Vec<String>>;
}

/// Maps an identifier to the name shown and matched against.
pub trait NameResolver {
    fn display_name(&self, id: &str) -> Result<String>;

    fn resolve(&self, id: &str) -> Result<Candidate> {
        let name = self.display_name(id)?;
        Ok(Candidate::new(id, name))
    }
}

/// Side-effecting "open this item" hook.
pub trait Activator {
    fn activate(&mut self, candidate: &Candidate) -> Result<()>;
}

impl<R: NameResolver + ?Sized> NameResolver for &R {
    fn display_name(&self, id: &str) -> Result<String> {
        (**self).display_name(id)
    }
}

impl<S: CandidateSource + ?Sized> CandidateSource for &S {
    fn candidates(&self, query: &str) -> Result<Vec<String>> {
        (**self).candidates(query)
    }
}
