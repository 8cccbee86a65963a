use clap::Parser;
use std::path::PathBuf;

/// Power ranking season export
///
/// Walks every tracked player's start.gg tournament history, keeps the
/// offline singles events that qualify for the season, and writes summaries
/// and a placement grid.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Tracked players, one `name---user_id***discriminator` per line
    #[arg(long, default_value = "user-ids.txt")]
    pub roster: PathBuf,

    /// start.gg API tokens, one per line; requests rotate across them
    #[arg(long, default_value = "tokens.txt")]
    pub tokens: PathBuf,

    /// Built-in season to use (fall-2022, winter-2023)
    #[arg(long, default_value = "winter-2023")]
    pub season: String,

    /// TOML season file; takes precedence over --season
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory the summaries and Placements.csv are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Also write the spreadsheet rows as CSV to this path
    #[arg(long)]
    pub sheet: Option<PathBuf>,

    /// Skip the standings queries and Placements.csv
    #[arg(long)]
    pub skip_placements: bool,

    /// Whether to log on the debug level
    #[arg(long)]
    pub debug: bool,
}
