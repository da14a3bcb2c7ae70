use crate::core::candidate::NameResolver;
use crate::core::session::{Hit, SearchSession};
use crate::ui::scroll::ScrollState;
use crate::ui::span::{Span, SpanLine, highlight_spans, truncate_line};
use crate::ui::style::{Color, Style};

const PROMPT: &str = "> ";
const ACTIVE_MARKER: &str = "› ";
const IDLE_MARKER: &str = "  ";

/// Turns a session into the lines of the picker: the query prompt, a status
/// line, then a scrolling window over the result rows.
#[derive(Debug, Clone)]
pub struct ResultView {
    scroll: ScrollState,
}

impl ResultView {
    pub fn new(max_visible: usize) -> Self {
        Self {
            scroll: ScrollState::new(max_visible),
        }
    }

    pub fn render<R: NameResolver>(
        &mut self,
        session: &SearchSession<R>,
        width: usize,
    ) -> Vec<SpanLine> {
        let results = session.results();
        let active = session.selected_index();
        self.scroll.follow(active, results.len());

        let mut lines = vec![
            vec![
                Span::styled(PROMPT, Style::new().color(Color::Cyan).bold()),
                Span::new(session.query()),
            ],
            vec![Span::styled(status(session), Style::new().dim())],
        ];

        let window = self.scroll.window(results.len());
        for (index, hit) in results[window.clone()].iter().enumerate() {
            lines.push(row(hit, window.start + index == active));
        }

        lines
            .into_iter()
            .map(|line| truncate_line(line, width))
            .collect()
    }
}

fn status<R: NameResolver>(session: &SearchSession<R>) -> String {
    let count = session.results().len();
    if session.is_showing_history() {
        if count == 0 {
            "  no recent items".to_string()
        } else {
            format!("  recent ({count})")
        }
    } else if count == 0 {
        "  no matches".to_string()
    } else {
        format!("  {count} matches")
    }
}

fn row(hit: &Hit, active: bool) -> SpanLine {
    let (marker, base) = if active {
        (
            Span::styled(ACTIVE_MARKER, Style::new().color(Color::Green).bold()),
            Style::new().bold(),
        )
    } else {
        (Span::new(IDLE_MARKER), Style::default())
    };
    let highlight = Style::new().color(Color::Yellow).bold();

    let mut line = vec![marker];
    line.extend(highlight_spans(
        &hit.candidate.name,
        &hit.ranges,
        base,
        highlight,
    ));
    if hit.candidate.id != hit.candidate.name {
        line.push(Span::styled(
            format!("  {}", hit.candidate.id),
            Style::new().color(Color::DarkGrey),
        ));
    }
    line
}
