//! Key handling for the interactive picker, independent of the terminal.

use crate::core::candidate::{Candidate, CandidateSource, NameResolver};
use crate::core::selection::Navigate;
use crate::core::session::SearchSession;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::ui::span::SpanLine;
use crate::ui::view::ResultView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Continue,
    Confirmed(Candidate),
    Cancelled,
}

pub struct Picker<R> {
    session: SearchSession<R>,
    view: ResultView,
}

impl<R: NameResolver + CandidateSource> Picker<R> {
    /// Opens the session, so the first frame shows history.
    pub fn new(mut session: SearchSession<R>, max_visible: usize) -> Self {
        session.open();
        Self {
            session,
            view: ResultView::new(max_visible),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => PickerOutcome::Cancelled,
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => PickerOutcome::Cancelled,
            KeyCode::Enter => match self.session.confirm() {
                Some(candidate) => PickerOutcome::Confirmed(candidate),
                None => PickerOutcome::Continue,
            },
            KeyCode::Down | KeyCode::Tab => self.navigate(Navigate::Next),
            KeyCode::Char('n') if ctrl => self.navigate(Navigate::Next),
            KeyCode::Up | KeyCode::BackTab => self.navigate(Navigate::Previous),
            KeyCode::Char('p') if ctrl => self.navigate(Navigate::Previous),
            KeyCode::Home => self.navigate(Navigate::First),
            KeyCode::End => self.navigate(Navigate::Last),
            KeyCode::Char('u') if ctrl => self.edit(|query| query.clear()),
            KeyCode::Char('w') if ctrl => self.edit(delete_word),
            KeyCode::Backspace => self.edit(|query| {
                query.pop();
            }),
            KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.edit(|query| query.push(ch))
            }
            _ => PickerOutcome::Continue,
        }
    }

    pub fn lines(&mut self, width: usize) -> Vec<SpanLine> {
        self.view.render(&self.session, width)
    }

    pub fn session(&self) -> &SearchSession<R> {
        &self.session
    }

    pub fn into_session(self) -> SearchSession<R> {
        self.session
    }

    fn navigate(&mut self, nav: Navigate) -> PickerOutcome {
        self.session.on_key_navigate(nav);
        PickerOutcome::Continue
    }

    fn edit(&mut self, change: impl FnOnce(&mut String)) -> PickerOutcome {
        let mut query = self.session.query().to_string();
        change(&mut query);
        self.session.search(&query);
        PickerOutcome::Continue
    }
}

fn delete_word(query: &mut String) {
    let trimmed = query.trim_end_matches(char::is_whitespace).len();
    query.truncate(trimmed);
    let cut = query
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map(|(idx, ch)| idx + ch.len_utf8())
        .unwrap_or(0);
    query.truncate(cut);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{Picker, PickerOutcome, delete_word};
    use crate::core::candidate::{CandidateSource, NameResolver};
    use crate::core::session::{SearchSession, SessionOptions};
    use crate::core::state::SessionState;
    use crate::error::{QuickFindError, Result};
    use crate::terminal::{KeyCode, KeyEvent};

    struct Files(HashMap<String, String>, Vec<String>);

    impl Files {
        fn new(ids: &[&str]) -> Self {
            let names = ids
                .iter()
                .map(|id| (id.to_string(), id.rsplit('/').next().unwrap_or(*id).to_string()))
                .collect();
            Self(names, ids.iter().map(|id| id.to_string()).collect())
        }
    }

    impl NameResolver for Files {
        fn display_name(&self, id: &str) -> Result<String> {
            self.0
                .get(id)
                .cloned()
                .ok_or_else(|| QuickFindError::NotFound(id.to_string()))
        }
    }

    impl CandidateSource for Files {
        fn candidates(&self, _query: &str) -> Result<Vec<String>> {
            Ok(self.1.clone())
        }
    }

    fn picker(history: &[&str], query: &str) -> Picker<Files> {
        let files = Files::new(&["src/apple.txt", "src/application.cs", "src/banana.txt"]);
        let state = SessionState {
            query: query.to_string(),
            history: history.iter().map(|id| id.to_string()).collect(),
        };
        Picker::new(
            SearchSession::restore(files, state, SessionOptions::default()),
            10,
        )
    }

    fn type_text(picker: &mut Picker<Files>, text: &str) {
        for ch in text.chars() {
            picker.handle_key(KeyEvent::plain(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn opens_on_history_then_types_and_confirms() {
        let mut picker = picker(&["src/banana.txt"], "ap");
        assert!(picker.session().is_showing_history());
        assert_eq!(picker.session().result_ids(), vec!["src/banana.txt"]);

        type_text(&mut picker, "p");
        assert_eq!(picker.session().query(), "app");
        assert_eq!(
            picker.session().result_ids(),
            vec!["src/apple.txt", "src/application.cs"]
        );

        picker.handle_key(KeyEvent::plain(KeyCode::Down));
        let outcome = picker.handle_key(KeyEvent::plain(KeyCode::Enter));
        let PickerOutcome::Confirmed(candidate) = outcome else {
            panic!("expected a pick, got {outcome:?}");
        };
        assert_eq!(candidate.id, "src/application.cs");
        assert_eq!(
            picker.session().history().as_sequence(),
            vec!["src/application.cs", "src/banana.txt"]
        );
    }

    #[test]
    fn enter_without_results_keeps_going() {
        let mut picker = picker(&[], "");
        type_text(&mut picker, "zzz");
        assert_eq!(
            picker.handle_key(KeyEvent::plain(KeyCode::Enter)),
            PickerOutcome::Continue
        );
    }

    #[test]
    fn clearing_query_returns_to_history() {
        let mut picker = picker(&["src/apple.txt"], "");
        type_text(&mut picker, "ban");
        assert!(!picker.session().is_showing_history());
        picker.handle_key(KeyEvent::ctrl('u'));
        assert!(picker.session().is_showing_history());
        assert_eq!(picker.session().result_ids(), vec!["src/apple.txt"]);
    }

    #[test]
    fn backspace_re_ranks() {
        let mut picker = picker(&[], "");
        type_text(&mut picker, "apz");
        assert!(picker.session().results().is_empty());
        picker.handle_key(KeyEvent::plain(KeyCode::Backspace));
        assert_eq!(picker.session().results().len(), 2);
    }

    #[test]
    fn escape_and_ctrl_c_cancel() {
        let mut picker = picker(&[], "");
        assert_eq!(
            picker.handle_key(KeyEvent::plain(KeyCode::Esc)),
            PickerOutcome::Cancelled
        );
        assert_eq!(picker.handle_key(KeyEvent::ctrl('c')), PickerOutcome::Cancelled);
    }

    #[test]
    fn delete_word_drops_last_token() {
        let mut query = "main scene ".to_string();
        delete_word(&mut query);
        assert_eq!(query, "main ");
        delete_word(&mut query);
        assert_eq!(query, "");
    }
}
