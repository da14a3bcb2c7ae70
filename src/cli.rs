use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "quickfind")]
#[command(about = "Fuzzy file picker that remembers what you opened", version)]
pub struct Cli {
    /// YAML config file; defaults to <root>/.quickfind.yaml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory to search.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Session state file (last query and history); relative paths resolve
    /// against the root.
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive picker; prints the chosen path.
    Pick(PickArgs),
    /// Print the ranking for a query.
    Rank(RankArgs),
    /// Print recently picked items, most recent first.
    History(HistoryArgs),
    /// Record an item as picked without opening the picker.
    Select(SelectArgs),
}

#[derive(Debug, Args)]
pub struct PickArgs {
    /// Start with this query instead of the saved one.
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct RankArgs {
    pub query: String,

    #[arg(long)]
    pub limit: Option<usize>,

    /// Append the score to each line.
    #[arg(long)]
    pub scores: bool,

    #[arg(long, conflicts_with = "scores")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Root-relative path of the item.
    pub id: String,
}
