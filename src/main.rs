mod cli;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use quickfind::candidate::{Activator, Candidate, NameResolver};
use quickfind::session::{SearchSession, SessionOptions};
use quickfind::state::{JsonFileStore, SessionStore};
use quickfind::terminal::{Terminal, TerminalEvent};
use quickfind::{Config, FileCatalog, PathActivator, Picker, PickerOutcome};

use crate::cli::{Cli, Command, HistoryArgs, PickArgs, RankArgs, SelectArgs};

const LOG_ENV: &str = "QUICKFIND_LOG";
const EXIT_CANCELLED: u8 = 130;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(&cli)?;
    let store = JsonFileStore::new(config.state_path());
    let catalog = FileCatalog::scan(&config)
        .with_context(|| format!("failed to scan {}", config.root.display()))?;

    match cli.command {
        Command::Pick(args) => pick(&config, &catalog, &store, args),
        Command::Rank(args) => rank(&config, &catalog, args).map(|()| ExitCode::SUCCESS),
        Command::History(args) => {
            history(&config, &catalog, &store, args).map(|()| ExitCode::SUCCESS)
        }
        Command::Select(args) => {
            select(&config, &catalog, &store, args).map(|()| ExitCode::SUCCESS)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut config = Config::discover(cli.config.as_deref(), &root)
        .context("failed to load config")?;
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if let Some(state) = &cli.state {
        config.state_file = state.clone();
    }
    config.validate().context("invalid config")?;
    debug!(root = %config.root.display(), "using config");
    Ok(config)
}

fn pick(
    config: &Config,
    catalog: &FileCatalog,
    store: &JsonFileStore,
    args: PickArgs,
) -> Result<ExitCode> {
    let mut state = store.load_or_default();
    let initial = args.query.is_some();
    if let Some(query) = args.query {
        state.query = query;
    }
    let mut session = SearchSession::restore(catalog, state, config.session_options());
    if initial {
        let query = session.query().to_string();
        session.search(&query);
    }

    let mut picker = Picker::new(session, config.max_visible);
    let picked = run_picker(&mut picker)?;
    let session = picker.into_session();
    save(store, &session)?;

    let Some(candidate) = picked else {
        return Ok(ExitCode::from(EXIT_CANCELLED));
    };
    let mut activator = PathActivator::new(catalog, io::stdout().lock());
    if let Err(err) = activator.activate(&candidate) {
        warn!(id = %candidate.id, error = %err, "activation failed");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_picker(picker: &mut Picker<&FileCatalog>) -> io::Result<Option<Candidate>> {
    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;
    terminal.hide_cursor()?;

    let result = event_loop(&mut terminal, picker);

    terminal.clear()?;
    terminal.show_cursor()?;
    terminal.exit_raw_mode()?;

    result
}

fn event_loop(
    terminal: &mut Terminal,
    picker: &mut Picker<&FileCatalog>,
) -> io::Result<Option<Candidate>> {
    let mut render_requested = true;

    loop {
        if render_requested {
            let lines = picker.lines(usize::from(terminal.width()));
            terminal.draw(&lines)?;
            render_requested = false;
        }

        if !terminal.poll(Duration::from_millis(100))? {
            continue;
        }
        match terminal.read_event()? {
            TerminalEvent::Key(key) => match picker.handle_key(key) {
                PickerOutcome::Continue => render_requested = true,
                PickerOutcome::Confirmed(candidate) => return Ok(Some(candidate)),
                PickerOutcome::Cancelled => return Ok(None),
            },
            TerminalEvent::Resize { .. } => render_requested = true,
        }
    }
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    id: &'a str,
    name: &'a str,
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<i64>,
}

fn rank(config: &Config, catalog: &FileCatalog, args: RankArgs) -> Result<()> {
    let mut session = SearchSession::new(catalog, rank_options(config, args.limit));
    let hits = session.search(&args.query);
    let limit = args.limit.unwrap_or(hits.len());

    let rows: Vec<Row<'_>> = hits
        .iter()
        .take(limit)
        .map(|hit| Row {
            id: &hit.candidate.id,
            name: &hit.candidate.name,
            path: absolute(catalog.root(), &hit.candidate.id),
            score: hit.score,
        })
        .collect();

    let mut out = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }
    for row in rows {
        match (args.scores, row.score) {
            (true, Some(score)) => writeln!(out, "{score:>6}  {}", row.id)?,
            _ => writeln!(out, "{}", row.id)?,
        }
    }
    Ok(())
}

/// `--limit` wins over the configured result cap.
fn rank_options(config: &Config, limit: Option<usize>) -> SessionOptions {
    let mut options = config.session_options();
    if let (Some(limit), Some(cap)) = (limit, options.max_results) {
        options.max_results = Some(cap.max(limit));
    }
    options
}

fn history(
    config: &Config,
    catalog: &FileCatalog,
    store: &JsonFileStore,
    args: HistoryArgs,
) -> Result<()> {
    let state = store.load_or_default();
    let mut session = SearchSession::restore(catalog, state, config.session_options());
    let hits = session.open();

    let mut out = io::stdout().lock();
    if args.json {
        let rows: Vec<Row<'_>> = hits
            .iter()
            .map(|hit| Row {
                id: &hit.candidate.id,
                name: &hit.candidate.name,
                path: absolute(catalog.root(), &hit.candidate.id),
                score: None,
            })
            .collect();
        serde_json::to_writer_pretty(&mut out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }
    for hit in hits {
        writeln!(out, "{}", hit.candidate.id)?;
    }
    Ok(())
}

fn select(
    config: &Config,
    catalog: &FileCatalog,
    store: &JsonFileStore,
    args: SelectArgs,
) -> Result<()> {
    let candidate = catalog
        .resolve(&args.id)
        .with_context(|| format!("cannot select {}", args.id))?;
    let state = store.load_or_default();
    let mut session = SearchSession::restore(catalog, state, config.session_options());
    session.on_select(&candidate);
    save(store, &session)
}

fn save(store: &JsonFileStore, session: &SearchSession<&FileCatalog>) -> Result<()> {
    store
        .save(&session.snapshot())
        .with_context(|| format!("failed to save {}", store.path().display()))
}

fn absolute(root: &Path, id: &str) -> PathBuf {
    root.join(id)
}

#[cfg(test)]
mod tests {
    use super::rank_options;
    use quickfind::Config;

    #[test]
    fn rank_limit_raises_result_cap() {
        let config = Config {
            max_results: Some(500),
            ..Config::default()
        };
        assert_eq!(rank_options(&config, Some(800)).max_results, Some(800));
        assert_eq!(rank_options(&config, Some(10)).max_results, Some(500));
        assert_eq!(rank_options(&config, None).max_results, Some(500));
    }

    #[test]
    fn uncapped_config_stays_uncapped() {
        let config = Config {
            max_results: None,
            ..Config::default()
        };
        assert_eq!(rank_options(&config, Some(5)).max_results, None);
    }
}
