//! Power ranking eligibility rules for tournaments and their events.
//!
//! Classification is pure: callers decide what to do with an ineligible event.

use crate::settings::SeasonConfig;
use startgg_api::{ActivityState, Event, Tournament};
use std::fmt;

/// Lower-cased name fragments that mark an event as something other than a
/// singles bracket.
pub const NON_SINGLES_KEYWORDS: [&str; 6] = [
    "squad strike",
    "crew battle",
    "redemption",
    "ladder",
    "doubles",
    "amateur",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Eligible,
    Ineligible(Vec<Reason>),
}

#[cfg(test)]
impl Verdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Verdict::Eligible)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    NotSingles { keyword: &'static str },
    TeamsEvent,
    TooFewEntrants { entrants: u32, required: u32 },
    NotStarted,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::NotSingles { keyword } => write!(f, "name contains \"{keyword}\""),
            Reason::TeamsEvent => write!(f, "teams event"),
            Reason::TooFewEntrants { entrants, required } => {
                write!(f, "{entrants} entrants, {required} required")
            }
            Reason::NotStarted => write!(f, "event still in CREATED state"),
        }
    }
}

/// Online tournaments never count, whatever their events look like.
pub fn is_tournament_eligible(tournament: &Tournament) -> bool {
    !tournament.is_online
}

/// Every failing rule is reported, in rule order.
pub fn classify(event: &Event, season: &SeasonConfig) -> Verdict {
    let mut reasons = Vec::new();

    let name = event.name.to_lowercase();
    if let Some(keyword) = NON_SINGLES_KEYWORDS.into_iter().find(|k| name.contains(k)) {
        reasons.push(Reason::NotSingles { keyword });
    }

    if event.is_teams_event {
        reasons.push(Reason::TeamsEvent);
    }

    let required = season.entrant_threshold(event.start_time);
    if event.num_entrants < required {
        reasons.push(Reason::TooFewEntrants { entrants: event.num_entrants, required });
    }

    if event.activity_state == ActivityState::Created {
        reasons.push(Reason::NotStarted);
    }

    if reasons.is_empty() {
        Verdict::Eligible
    } else {
        Verdict::Ineligible(reasons)
    }
}
