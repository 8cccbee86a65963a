pub mod client;
pub mod gateway;
pub mod queries;
pub mod startgg;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the start.gg wire format
// ---------------------------------------------------------------------------

/// A tournament as seen by the season pipeline. Keyed everywhere by `slug`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tournament {
    pub id: String,
    /// Stable identity, e.g. "tournament/spring-open".
    pub slug: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub is_online: bool,
    pub city: String,
    pub state: String,
    /// Retained (eligible) events, in the order the platform returned them.
    pub events: Vec<Event>,
    /// Gamer tags of out-of-region tracked players who attended, in visit order.
    pub notable_entries: Vec<String>,
}

impl Tournament {
    /// Public start.gg page for this tournament.
    pub fn url(&self) -> String {
        format!("https://start.gg/{}", self.slug)
    }

    /// Slug without its leading path segment ("tournament/foo" -> "foo").
    pub fn short_slug(&self) -> &str {
        self.slug
            .split_once('/')
            .map(|(_, rest)| rest)
            .unwrap_or(&self.slug)
    }

    /// Append a notable entry, ignoring tags already recorded.
    pub fn add_notable_entry(&mut self, gamer_tag: &str) {
        if !self.notable_entries.iter().any(|t| t == gamer_tag) {
            self.notable_entries.push(gamer_tag.to_owned());
        }
    }

    /// Largest entrant count among the retained events. Zero when there are none.
    pub fn max_entrants(&self) -> u32 {
        self.events.iter().map(|e| e.num_entrants).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub id: String,
    /// "tournament/<t>/event/<e>"
    pub slug: String,
    pub name: String,
    pub num_entrants: u32,
    pub is_teams_event: bool,
    pub activity_state: ActivityState,
    pub start_time: DateTime<Utc>,
    /// Slug of the owning tournament.
    pub tournament_slug: String,
}

/// Upstream lifecycle status of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActivityState {
    Created,
    Active,
    Queued,
    Ready,
    Invalid,
    Called,
    Completed,
    /// Missing or unrecognised upstream value.
    #[default]
    Unknown,
}

impl ActivityState {
    pub fn parse(s: &str) -> Self {
        match s {
            "CREATED" => ActivityState::Created,
            "ACTIVE" => ActivityState::Active,
            "QUEUED" => ActivityState::Queued,
            "READY" => ActivityState::Ready,
            "INVALID" => ActivityState::Invalid,
            "CALLED" => ActivityState::Called,
            "COMPLETED" => ActivityState::Completed,
            _ => ActivityState::Unknown,
        }
    }
}

/// One page of a user's reverse-chronological tournament history.
#[derive(Debug, Clone, Default)]
pub struct UserTournamentsPage {
    pub gamer_tag: Option<String>,
    pub tournaments: Vec<Tournament>,
    /// Entries the platform returned, including any that could not be mapped
    /// into `tournaments`. Compare this against the page size to detect the
    /// last page.
    pub node_count: usize,
}

/// A single standings row. `discriminator` is `None` when the entrant data
/// does not lead to a user (deleted accounts, anonymous entrants, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Standing {
    pub placement: Option<u32>,
    pub discriminator: Option<String>,
}
