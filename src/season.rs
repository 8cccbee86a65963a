//! Walks every tracked player's tournament history and builds the season's
//! tournament collection and per-player stats.
//!
//! The upstream history is assumed to be most-recent-first. Scanning for a
//! player stops after a run of out-of-window tournaments that follows an
//! in-window one, so a feed that is not reverse-chronological will lose data.

use crate::eligibility::{self, Reason, Verdict};
use crate::roster::{Roster, RosterEntry};
use crate::settings::SeasonConfig;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use startgg_api::gateway::Gateway;
use startgg_api::{Event, Tournament};
use std::collections::{HashMap, HashSet};

/// Consecutive out-of-window tournaments, after the window was found, that end
/// a player's scan.
pub const OUT_OF_WINDOW_LIMIT: u32 = 3;

// ---------------------------------------------------------------------------
// Window scanning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStep {
    InWindow,
    Skip,
    Stop,
}

/// Per-player state of the stop heuristic.
#[derive(Debug, Default)]
pub struct WindowScan {
    window_found: bool,
    out_of_window: u32,
}

impl WindowScan {
    pub fn observe(&mut self, in_window: bool) -> ScanStep {
        if in_window {
            self.window_found = true;
            self.out_of_window = 0;
            return ScanStep::InWindow;
        }
        if !self.window_found {
            return ScanStep::Skip;
        }
        self.out_of_window += 1;
        if self.out_of_window >= OUT_OF_WINDOW_LIMIT {
            ScanStep::Stop
        } else {
            ScanStep::Skip
        }
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Tournaments keyed by slug, kept in first-seen order.
#[derive(Debug, Default)]
pub struct TournamentCollection {
    tournaments: Vec<Tournament>,
    by_slug: HashMap<String, usize>,
}

impl TournamentCollection {
    /// Insert `tournament` unless its slug is already present; either way
    /// return the stored entry.
    pub fn get_or_insert(&mut self, tournament: Tournament) -> &mut Tournament {
        let idx = match self.by_slug.get(&tournament.slug) {
            Some(&idx) => idx,
            None => {
                let idx = self.tournaments.len();
                self.by_slug.insert(tournament.slug.clone(), idx);
                self.tournaments.push(tournament);
                idx
            }
        };
        &mut self.tournaments[idx]
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    #[cfg(test)]
    pub fn get(&self, slug: &str) -> Option<&Tournament> {
        self.by_slug.get(slug).map(|&idx| &self.tournaments[idx])
    }

    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tournament> {
        self.tournaments.iter_mut()
    }

    pub fn retain(&mut self, keep: impl FnMut(&Tournament) -> bool) {
        self.tournaments.retain(keep);
        self.reindex();
    }

    /// Earliest first; ties broken by slug.
    pub fn sort_chronologically(&mut self) {
        self.tournaments
            .sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.slug.cmp(&b.slug)));
        self.reindex();
    }

    pub fn into_vec(self) -> Vec<Tournament> {
        self.tournaments
    }

    fn reindex(&mut self) {
        self.by_slug = self
            .tournaments
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.slug.clone(), idx))
            .collect();
    }
}

/// In-window visits of one tracked player. Repeat visits are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub user_id: String,
    pub gamer_tag: String,
    /// Slugs of every in-window offline tournament attended.
    pub all_tournaments: Vec<String>,
    /// The subset of `all_tournaments` held in the home region.
    pub home_tournaments: Vec<String>,
}

impl UserStats {
    fn new(entry: &RosterEntry) -> Self {
        Self {
            user_id: entry.user_id.clone(),
            gamer_tag: entry.name.clone(),
            all_tournaments: Vec::new(),
            home_tournaments: Vec::new(),
        }
    }
}

/// An event excluded from the season, with enough tournament context to
/// report it after its tournament may have been dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedEvent {
    pub event: Event,
    pub reasons: Vec<Reason>,
    pub tournament_name: String,
    pub tournament_start: DateTime<Utc>,
    pub city: String,
    pub state: String,
}

/// Removed events, unique by event slug, in first-seen order.
#[derive(Debug, Default)]
pub struct RemovedEvents {
    events: Vec<RemovedEvent>,
    seen: HashSet<String>,
}

impl RemovedEvents {
    pub fn insert(&mut self, removed: RemovedEvent) -> bool {
        if !self.seen.insert(removed.event.slug.clone()) {
            return false;
        }
        self.events.push(removed);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemovedEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Season {
    /// Retained tournaments, earliest first. Placement columns follow this order.
    pub tournaments: Vec<Tournament>,
    /// Players with at least one retained visit, in roster order.
    pub users: Vec<UserStats>,
    pub removed_events: RemovedEvents,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Window pass over every roster member, then the event pass, then a
/// chronological sort.
pub fn build_season(roster: &Roster, gateway: &mut impl Gateway, season: &SeasonConfig) -> Season {
    let (mut collection, mut users) = collect_tournaments(roster, gateway, season);
    info!("{} tournaments found in the {} window", collection.len(), season.name);

    let removed_events = attach_events(&mut collection, gateway, season);

    for user in &mut users {
        user.all_tournaments.retain(|slug| collection.contains(slug));
        user.home_tournaments.retain(|slug| collection.contains(slug));
    }
    users.retain(|u| !u.all_tournaments.is_empty());

    collection.sort_chronologically();
    Season {
        tournaments: collection.into_vec(),
        users,
        removed_events,
    }
}

/// Window pass: in-window offline tournaments for every roster member, plus
/// the per-player visit stats and notable entries.
pub fn collect_tournaments(
    roster: &Roster,
    gateway: &mut impl Gateway,
    season: &SeasonConfig,
) -> (TournamentCollection, Vec<UserStats>) {
    let mut collection = TournamentCollection::default();
    let mut users = Vec::new();

    for entry in roster.entries() {
        info!("Processing {}'s tournaments...", entry.name);
        let stats = scan_user(entry, gateway, season, &mut collection);
        if !stats.all_tournaments.is_empty() {
            users.push(stats);
        }
    }

    (collection, users)
}

fn scan_user(
    entry: &RosterEntry,
    gateway: &mut impl Gateway,
    season: &SeasonConfig,
    collection: &mut TournamentCollection,
) -> UserStats {
    let mut stats = UserStats::new(entry);
    let mut scan = WindowScan::default();

    'pages: for page in 1..=season.max_pages {
        let result = match gateway.user_tournaments(&entry.user_id, page, season.page_size) {
            Ok(result) => result,
            Err(e) => {
                error!("tournaments for {} (page {page}): {e}", entry.name);
                break;
            }
        };

        if let Some(tag) = result.gamer_tag {
            stats.gamer_tag = tag;
        }

        let page_len = result.node_count;
        for tournament in result.tournaments {
            if !eligibility::is_tournament_eligible(&tournament) {
                debug!("skipping online tournament {}", tournament.slug);
                continue;
            }

            match scan.observe(season.in_window(tournament.start_time)) {
                ScanStep::InWindow => record_visit(tournament, &mut stats, season, collection),
                ScanStep::Skip => {
                    debug!(
                        "outside of season window --- {} {}",
                        tournament.name,
                        tournament.start_time.format("%m-%d-%Y")
                    );
                }
                ScanStep::Stop => {
                    debug!("{} consecutive tournaments outside the window for {}", OUT_OF_WINDOW_LIMIT, entry.name);
                    break 'pages;
                }
            }
        }

        if page_len < season.page_size as usize {
            break;
        }
        if page == season.max_pages {
            warn!("stopped {} at the {page} page limit", entry.name);
        }
    }

    stats
}

fn record_visit(
    tournament: Tournament,
    stats: &mut UserStats,
    season: &SeasonConfig,
    collection: &mut TournamentCollection,
) {
    let is_home = season.is_home_region(&tournament.state);
    debug!("{} attended {}", stats.gamer_tag, tournament.name);

    stats.all_tournaments.push(tournament.slug.clone());
    if is_home {
        stats.home_tournaments.push(tournament.slug.clone());
    }

    let stored = collection.get_or_insert(tournament);
    if !is_home {
        stored.add_notable_entry(&stats.gamer_tag);
    }
}

/// Event pass: fetch each tournament's events, keep the eligible ones, and
/// drop tournaments left without any. A failed fetch counts as no events.
pub fn attach_events(
    collection: &mut TournamentCollection,
    gateway: &mut impl Gateway,
    season: &SeasonConfig,
) -> RemovedEvents {
    let mut removed = RemovedEvents::default();

    for tournament in collection.iter_mut() {
        info!("{}", tournament.name);
        let events = match gateway.tournament_events(tournament) {
            Ok(events) => events,
            Err(e) => {
                error!("events for {}: {e}", tournament.slug);
                Vec::new()
            }
        };

        for event in events {
            match eligibility::classify(&event, season) {
                Verdict::Eligible => {
                    debug!("---{}", event.name);
                    tournament.events.push(event);
                }
                Verdict::Ineligible(reasons) => {
                    info!(
                        "Removing event: {} -- {} ({})",
                        tournament.name,
                        event.name,
                        reasons.iter().map(Reason::to_string).collect::<Vec<_>>().join(", ")
                    );
                    removed.insert(RemovedEvent {
                        event,
                        reasons,
                        tournament_name: tournament.name.clone(),
                        tournament_start: tournament.start_time,
                        city: tournament.city.clone(),
                        state: tournament.state.clone(),
                    });
                }
            }
        }
    }

    collection.retain(|t| {
        if t.events.is_empty() {
            info!("Removing {}", t.name);
        }
        !t.events.is_empty()
    });

    removed
}
