//! Query-to-results orchestration.
//!
//! A [`SearchSession`] owns the query text, the history list and the current
//! result rows. Each query edit re-ranks the candidates it is handed; an empty
//! query shows the history instead. Right after a restore the first render
//! also shows history, even when the restored query is not empty, until the
//! query is edited.

use tracing::{debug, warn};

use super::candidate::{Activator, Candidate, CandidateSource, NameResolver};
use super::history::{DEFAULT_HISTORY_CAPACITY, HistoryList};
use super::search::rank::{rank_by, rank_parallel};
use super::selection::{Navigate, Selection};
use super::state::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub history_capacity: usize,
    /// Cap on ranked rows; history rows are bounded by the capacity instead.
    pub max_results: Option<usize>,
    /// Scoring threads per query. One keeps everything on the caller.
    pub workers: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_results: None,
            workers: 1,
        }
    }
}

/// One result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub candidate: Candidate,
    /// `None` for history rows.
    pub score: Option<i64>,
    pub ranges: Vec<(usize, usize)>,
}

impl Hit {
    fn from_history(candidate: Candidate) -> Self {
        Self {
            candidate,
            score: None,
            ranges: Vec::new(),
        }
    }
}

pub struct SearchSession<R> {
    resolver: R,
    options: SessionOptions,
    query: String,
    history: HistoryList,
    results: Vec<Hit>,
    selection: Selection,
    showing_history: bool,
    history_pending: bool,
}

impl<R: NameResolver> SearchSession<R> {
    pub fn new(resolver: R, options: SessionOptions) -> Self {
        Self::restore(resolver, SessionState::default(), options)
    }

    pub fn restore(resolver: R, state: SessionState, options: SessionOptions) -> Self {
        let history = HistoryList::from_entries(options.history_capacity, state.history);
        debug!(
            query = %state.query,
            history = history.len(),
            "restored search session"
        );
        Self {
            resolver,
            options,
            query: state.query,
            history,
            results: Vec::new(),
            selection: Selection::default(),
            showing_history: false,
            history_pending: true,
        }
    }

    /// First render after a restore. Shows history once; later calls keep
    /// whatever the last query produced.
    pub fn open(&mut self) -> &[Hit] {
        if self.history_pending {
            self.history_pending = false;
            self.show_history();
        }
        &self.results
    }

    pub fn on_query_changed(&mut self, query: &str, candidates: Vec<Candidate>) -> &[Hit] {
        self.query.clear();
        self.query.push_str(query);
        self.history_pending = false;
        self.selection.reset();

        if query.is_empty() {
            self.show_history();
        } else {
            self.show_ranked(candidates);
        }
        &self.results
    }

    pub fn on_key_navigate(&mut self, nav: Navigate) -> bool {
        self.selection.apply(nav, self.results.len())
    }

    pub fn on_select(&mut self, candidate: &Candidate) {
        self.history.record_use(candidate.id.clone());
        debug!(id = %candidate.id, history = self.history.len(), "recorded use");
    }

    /// Selects the highlighted row. `None` when there is nothing to pick.
    pub fn confirm(&mut self) -> Option<Candidate> {
        if self.results.is_empty() {
            return None;
        }
        let index = if self.selection.index() >= self.results.len() {
            0
        } else {
            self.selection.index()
        };
        let candidate = self.results[index].candidate.clone();
        self.on_select(&candidate);
        Some(candidate)
    }

    /// Confirms and hands the pick to `activator`. Activation failures are
    /// logged; the pick still counts as used.
    pub fn activate(&mut self, activator: &mut impl Activator) -> Option<Candidate> {
        let candidate = self.confirm()?;
        if let Err(err) = activator.activate(&candidate) {
            warn!(id = %candidate.id, error = %err, "activation failed");
        }
        Some(candidate)
    }

    /// State worth keeping when the picker closes.
    pub fn snapshot(&self) -> SessionState {
        SessionState {
            query: self.query.clone(),
            history: self.history.as_sequence(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Hit] {
        &self.results
    }

    pub fn result_ids(&self) -> Vec<&str> {
        self.results
            .iter()
            .map(|hit| hit.candidate.id.as_str())
            .collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selection.index()
    }

    pub fn selected(&self) -> Option<&Hit> {
        self.results.get(self.selection.index())
    }

    pub fn is_showing_history(&self) -> bool {
        self.showing_history
    }

    pub fn history(&self) -> &HistoryList {
        &self.history
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn show_history(&mut self) {
        let resolver = &self.resolver;
        self.results = self
            .history
            .iter()
            .filter_map(|id| match resolver.resolve(id) {
                Ok(candidate) => Some(Hit::from_history(candidate)),
                Err(err) => {
                    warn!(id, error = %err, "skipping unresolvable history entry");
                    None
                }
            })
            .collect();
        self.showing_history = true;
        self.selection.clamp(self.results.len());
    }

    fn show_ranked(&mut self, candidates: Vec<Candidate>) {
        let mut matches = if self.options.workers > 1 {
            rank_parallel(
                &self.query,
                &candidates,
                self.options.workers,
                candidate_name,
            )
        } else {
            rank_by(&self.query, &candidates, candidate_name)
        };
        if let Some(limit) = self.options.max_results {
            matches.truncate(limit);
        }

        let mut slots: Vec<Option<Candidate>> = candidates.into_iter().map(Some).collect();
        self.results = matches
            .into_iter()
            .filter_map(|found| {
                slots[found.index].take().map(|candidate| Hit {
                    candidate,
                    score: Some(found.score),
                    ranges: found.ranges,
                })
            })
            .collect();
        self.showing_history = false;
        self.selection.clamp(self.results.len());
    }
}

fn candidate_name(candidate: &Candidate) -> &str {
    &candidate.name
}

impl<R: NameResolver + CandidateSource> SearchSession<R> {
    /// Pulls identifiers for `query` from the resolver's own source, resolves
    /// their names and re-ranks. Unresolvable identifiers are left out; a
    /// failing source yields no rows.
    pub fn search(&mut self, query: &str) -> &[Hit] {
        if query.is_empty() {
            return self.on_query_changed(query, Vec::new());
        }

        let ids = match self.resolver.candidates(query) {
            Ok(ids) => ids,
            Err(err) => {
                warn!(query, error = %err, "candidate source failed");
                Vec::new()
            }
        };
        let candidates: Vec<Candidate> = ids
            .iter()
            .filter_map(|id| match self.resolver.resolve(id) {
                Ok(candidate) => Some(candidate),
                Err(err) => {
                    warn!(id = %id, error = %err, "skipping unresolvable candidate");
                    None
                }
            })
            .collect();
        self.on_query_changed(query, candidates)
    }
}
