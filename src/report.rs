//! Flat-file and CSV exports of a finished season.

use crate::placements::PlacementMatrix;
use crate::roster::Roster;
use crate::season::{RemovedEvent, Season, UserStats};
use anyhow::Context;
use log::info;
use startgg_api::Tournament;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const TOURNEY_NAMES_FILE: &str = "tourney_names.txt";
pub const TOURNEY_SLUGS_FILE: &str = "tourney_slugs.txt";
pub const REMOVED_EVENTS_FILE: &str = "removed_events.txt";
pub const USER_STATS_FILE: &str = "user_stats.txt";
pub const PLACEMENTS_FILE: &str = "Placements.csv";

/// Blank columns between the entrant count and the notable entries in the
/// spreadsheet layout.
const SHEET_PADDING_COLUMNS: usize = 16;

fn notable_suffix(tournament: &Tournament) -> String {
    if tournament.notable_entries.is_empty() {
        String::new()
    } else {
        format!(" --- {}", tournament.notable_entries.join(", "))
    }
}

/// `name --- MM/DD --- city, state --- url[ --- notable, entries]`
pub fn write_tournament_summary<W: Write>(out: &mut W, tournaments: &[Tournament]) -> std::io::Result<()> {
    for t in tournaments {
        writeln!(
            out,
            "{} --- {} --- {}, {} --- {}{}",
            t.name,
            t.start_time.format("%m/%d"),
            t.city,
            t.state,
            t.url(),
            notable_suffix(t)
        )?;
    }
    Ok(())
}

/// `start --- slug --- city, state[ --- notable, entries]`
pub fn write_tournament_slugs<W: Write>(out: &mut W, tournaments: &[Tournament]) -> std::io::Result<()> {
    for t in tournaments {
        writeln!(
            out,
            "{} --- {} --- {}, {}{}",
            t.start_time.format("%Y-%m-%d %H:%M:%S"),
            t.slug,
            t.city,
            t.state,
            notable_suffix(t)
        )?;
    }
    Ok(())
}

pub fn write_removed_events<'a, W: Write>(
    out: &mut W,
    removed: impl IntoIterator<Item = &'a RemovedEvent>,
) -> std::io::Result<()> {
    for (i, r) in removed.into_iter().enumerate() {
        writeln!(
            out,
            "{}.) {} --- Tourney: {} --- Event: {} --- {}, {}",
            i + 1,
            r.tournament_start.format("%Y-%m-%d %H:%M:%S"),
            r.tournament_name,
            r.event.name,
            r.city,
            r.state
        )?;
    }
    Ok(())
}

pub fn write_user_stats<W: Write>(out: &mut W, users: &[UserStats], home_region: &str) -> std::io::Result<()> {
    for user in users {
        writeln!(
            out,
            "{} --- All tournies: {} --- {home_region} events: {}",
            user.gamer_tag,
            user.all_tournaments.len(),
            user.home_tournaments.len()
        )?;
    }
    Ok(())
}

/// Rows are roster names (one per distinct name), columns are tournament
/// short slugs. Column headers
/// come from `tournaments`, which must be the list the matrix was built from.
pub fn write_placements_csv<W: Write>(
    out: W,
    matrix: &PlacementMatrix,
    roster: &Roster,
    tournaments: &[Tournament],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header = vec![String::new()];
    header.extend(tournaments.iter().map(|t| t.short_slug().to_owned()));
    wtr.write_record(&header)?;

    for entry in roster.placement_rows() {
        let Some(slots) = matrix.row(&entry.discriminator) else {
            continue;
        };
        let mut record = vec![entry.name.clone()];
        record.extend(slots.iter().map(|s| s.map(|p| p.to_string()).unwrap_or_default()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Entrant estimate for the spreadsheet: the biggest retained event, or
/// "Error" when nothing was retained.
pub fn entrant_estimate(tournament: &Tournament) -> String {
    match tournament.max_entrants() {
        0 => "Error".to_owned(),
        n => n.to_string(),
    }
}

/// One row per tournament: index, name, MM/DD, entrants, padding, notable
/// entries, details URL.
pub fn write_sheet<W: Write>(out: W, tournaments: &[Tournament]) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(false).from_writer(out);

    for (i, t) in tournaments.iter().enumerate() {
        let mut row = vec![
            (i + 1).to_string(),
            t.name.clone(),
            t.start_time.format("%m/%d").to_string(),
            entrant_estimate(t),
        ];
        row.extend(std::iter::repeat_n(String::new(), SHEET_PADDING_COLUMNS));
        row.push(t.notable_entries.join(", "));
        row.push(format!("{}/details", t.url()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn create(dir: &Path, name: &str) -> anyhow::Result<BufWriter<File>> {
    let path = dir.join(name);
    let file = File::create(&path).with_context(|| format!("could not create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// The four text summaries, written into `dir`.
pub fn write_season_files(dir: &Path, season: &Season, home_region: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;

    let mut names = create(dir, TOURNEY_NAMES_FILE)?;
    write_tournament_summary(&mut names, &season.tournaments)?;
    names.flush()?;

    let mut slugs = create(dir, TOURNEY_SLUGS_FILE)?;
    write_tournament_slugs(&mut slugs, &season.tournaments)?;
    slugs.flush()?;

    let mut removed_out = create(dir, REMOVED_EVENTS_FILE)?;
    write_removed_events(&mut removed_out, season.removed_events.iter())?;
    removed_out.flush()?;

    let mut stats = create(dir, USER_STATS_FILE)?;
    write_user_stats(&mut stats, &season.users, home_region)?;
    stats.flush()?;

    info!("wrote season summaries to {}", dir.display());
    Ok(())
}

pub fn write_placements_file(
    dir: &Path,
    matrix: &PlacementMatrix,
    roster: &Roster,
    tournaments: &[Tournament],
) -> anyhow::Result<()> {
    info!("Formatting placement data...");
    write_placements_csv(create(dir, PLACEMENTS_FILE)?, matrix, roster, tournaments)
}

pub fn write_sheet_file(path: &Path, tournaments: &[Tournament]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("could not create {}", path.display()))?;
    write_sheet(BufWriter::new(file), tournaments)?;
    info!("wrote {} spreadsheet rows to {}", tournaments.len(), path.display());
    Ok(())
}
