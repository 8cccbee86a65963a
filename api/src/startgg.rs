//! start.gg GraphQL raw wire types: serde shapes for the three queries we run.
//! These map to the clean domain types in client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GraphqlError {
    pub message: Option<String>,
}

/// start.gg returns ids as numbers on some fields and strings on others.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    String(String),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            WireId::Number(n) => n.to_string(),
            WireId::String(s) => s,
        }
    }
}

// ---------------------------------------------------------------------------
// Tournaments by user
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct UserTournamentsData {
    pub user: Option<WireUser>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WireUser {
    pub player: Option<WirePlayer>,
    pub tournaments: Option<Connection<WireTournament>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WirePlayer {
    pub gamer_tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub nodes: Option<Vec<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: None }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireTournament {
    pub id: Option<WireId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    /// Unix seconds.
    pub start_at: Option<i64>,
    pub is_online: Option<bool>,
    pub city: Option<String>,
    pub addr_state: Option<String>,
}

// ---------------------------------------------------------------------------
// Events by tournament
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct TournamentEventsData {
    pub tournament: Option<WireTournamentEvents>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WireTournamentEvents {
    pub events: Option<Vec<WireEvent>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    pub id: Option<WireId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub num_entrants: Option<u32>,
    /// 1 = singles, 5 = teams.
    #[serde(rename = "type")]
    pub event_type: Option<i64>,
    pub team_roster_size: Option<WireTeamRosterSize>,
    pub state: Option<String>,
    pub start_at: Option<i64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireTeamRosterSize {
    pub max_players: Option<u32>,
}

// ---------------------------------------------------------------------------
// Event standings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct EventStandingsData {
    pub event: Option<WireEventStandings>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WireEventStandings {
    pub standings: Option<Connection<WireStanding>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireStanding {
    pub placement: Option<u32>,
    pub entrant: Option<WireEntrant>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireEntrant {
    pub participants: Option<Vec<WireParticipant>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireParticipant {
    pub user: Option<WireParticipantUser>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireParticipantUser {
    pub discriminator: Option<String>,
}
