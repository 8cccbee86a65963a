mod cli;
mod eligibility;
mod logging;
mod placements;
mod report;
mod roster;
mod season;
mod settings;
#[cfg(test)]
mod testing;

use crate::cli::Args;
use crate::roster::Roster;
use crate::settings::SeasonConfig;
use anyhow::{Context, anyhow};
use clap::Parser;
use log::{info, warn};
use startgg_api::client::STARTGG_GQL_ALPHA;
use startgg_api::gateway::QueryGateway;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    better_panic::install();
    logging::init_logger(args.debug);

    run(&args)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let season = load_season(args)?;
    info!(
        "season {}: {} to {}",
        season.name, season.window_start, season.window_end
    );

    let roster = Roster::load(&args.roster)?;
    if roster.is_empty() {
        warn!("{} lists no players, the reports will be empty", args.roster.display());
    }
    info!("{} tracked players", roster.len());

    let tokens = roster::load_tokens(&args.tokens)?;
    let endpoint =
        std::env::var("STARTGG_API_URL").unwrap_or_else(|_| STARTGG_GQL_ALPHA.to_owned());
    let mut gateway =
        QueryGateway::new(&endpoint, &tokens).context("could not set up the query gateway")?;

    let result = season::build_season(&roster, &mut gateway, &season);
    info!(
        "{} tournaments and {} removed events in the season",
        result.tournaments.len(),
        result.removed_events.len()
    );

    report::write_season_files(&args.out_dir, &result, &season.home_region)?;

    if let Some(path) = &args.sheet {
        report::write_sheet_file(path, &result.tournaments)?;
    }

    if !args.skip_placements {
        let matrix = placements::collect_placements(
            &result.tournaments,
            &roster,
            &mut gateway,
            season.standings_page_size,
        );
        report::write_placements_file(&args.out_dir, &matrix, &roster, &result.tournaments)?;
    }

    info!("Process is complete.");
    Ok(())
}

fn load_season(args: &Args) -> anyhow::Result<SeasonConfig> {
    if let Some(path) = &args.config {
        return SeasonConfig::load(path);
    }
    SeasonConfig::preset(&args.season).ok_or_else(|| {
        anyhow!(
            "unknown season {:?}, expected one of {}",
            args.season,
            SeasonConfig::PRESETS.join(", ")
        )
    })
}
