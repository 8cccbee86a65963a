use crate::queries::{EVENT_STANDINGS, EVENTS_BY_TOURNAMENT, TOURNAMENTS_BY_USER};
use crate::startgg::{
    EventStandingsData, GraphqlResponse, TournamentEventsData, UserTournamentsData, WireEvent,
    WireStanding, WireTournament,
};
use crate::{ActivityState, Event, Standing, Tournament, UserTournamentsPage};
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const STARTGG_GQL_ALPHA: &str = "https://api.start.gg/gql/alpha";

/// Upper bound start.gg accepts for `perPage` on standings before rejecting
/// the query for complexity.
pub const MAX_STANDINGS_PER_PAGE: u32 = 199;

const EVENT_TYPE_TEAMS: i64 = 5;

/// One authenticated start.gg GraphQL client. Blocking: every call waits for
/// its round-trip before returning.
#[derive(Debug, Clone)]
pub struct StartggApi {
    client: Client,
    endpoint: String,
    token: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// The envelope carried an `errors` array.
    Graphql(Vec<String>),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Graphql(messages) => write!(f, "GraphQL errors: {}", messages.join("; ")),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            _ => None,
        }
    }
}

impl StartggApi {
    pub fn new(endpoint: &str, token: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent("pr-tracker/0.1 (power ranking season export)")
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.to_owned(),
            token: token.trim().to_owned(),
            timeout: Duration::from_secs(30),
        }
    }

    /// One page of the user's tournaments, most recent first.
    pub fn fetch_user_tournaments(
        &self,
        user_id: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<UserTournamentsPage> {
        let variables = json!({ "userId": user_id, "page": page, "perPage": per_page });
        let data: UserTournamentsData = self.execute(TOURNAMENTS_BY_USER, variables)?;
        let user = data
            .user
            .ok_or_else(|| ApiError::NotFound(format!("user {user_id}")))?;

        let gamer_tag = user.player.and_then(|p| p.gamer_tag);
        let nodes = user.tournaments.and_then(|c| c.nodes).unwrap_or_default();
        let node_count = nodes.len();
        let tournaments: Vec<_> = nodes.into_iter().filter_map(map_tournament).collect();
        if tournaments.len() < node_count {
            debug!(
                "user {user_id} page {page}: dropped {} tournaments without slug or start time",
                node_count - tournaments.len()
            );
        }

        Ok(UserTournamentsPage { gamer_tag, tournaments, node_count })
    }

    /// All events of `tournament`, mapped with a back-reference to its slug.
    pub fn fetch_tournament_events(&self, tournament: &Tournament) -> ApiResult<Vec<Event>> {
        let variables = json!({ "slug": tournament.slug });
        let data: TournamentEventsData = self.execute(EVENTS_BY_TOURNAMENT, variables)?;
        let raw = data
            .tournament
            .ok_or_else(|| ApiError::NotFound(format!("tournament {}", tournament.slug)))?;

        Ok(raw
            .events
            .unwrap_or_default()
            .iter()
            .map(|e| map_event(e, tournament))
            .collect())
    }

    /// First page of an event's standings. `per_page` is clamped to
    /// [`MAX_STANDINGS_PER_PAGE`].
    pub fn fetch_event_standings(&self, event_id: &str, per_page: u32) -> ApiResult<Vec<Standing>> {
        let per_page = per_page.min(MAX_STANDINGS_PER_PAGE);
        let variables = json!({ "eventId": event_id, "page": 1, "perPage": per_page });
        let data: EventStandingsData = self.execute(EVENT_STANDINGS, variables)?;
        let event = data
            .event
            .ok_or_else(|| ApiError::NotFound(format!("event {event_id}")))?;

        Ok(event
            .standings
            .and_then(|c| c.nodes)
            .unwrap_or_default()
            .iter()
            .map(map_standing)
            .collect())
    }

    fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> ApiResult<T> {
        let url = self.endpoint.as_str();
        let body = json!({ "query": query, "variables": variables });
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .map_err(|e| ApiError::Network(e, url.to_owned()))?
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?;

        let envelope: GraphqlResponse<T> = response
            .json()
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))?;

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            let messages = errors
                .into_iter()
                .map(|e| e.message.unwrap_or_else(|| "unknown error".into()))
                .collect();
            return Err(ApiError::Graphql(messages));
        }

        envelope
            .data
            .ok_or_else(|| ApiError::Other("response carried neither data nor errors".into()))
    }
}

// ---------------------------------------------------------------------------
// Mapping: start.gg wire types → clean domain types
// ---------------------------------------------------------------------------

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Tournaments without a slug or start time cannot be keyed or windowed and
/// are dropped.
fn map_tournament(raw: WireTournament) -> Option<Tournament> {
    let slug = raw.slug?;
    let start_time = raw.start_at.and_then(timestamp)?;

    Some(Tournament {
        id: raw.id.map(|id| id.into_string()).unwrap_or_default(),
        name: raw.name.unwrap_or_else(|| slug.clone()),
        slug,
        start_time,
        is_online: raw.is_online.unwrap_or(false),
        city: raw.city.unwrap_or_default(),
        state: raw.addr_state.unwrap_or_default(),
        events: Vec::new(),
        notable_entries: Vec::new(),
    })
}

fn map_event(raw: &WireEvent, tournament: &Tournament) -> Event {
    let name = raw.name.clone().unwrap_or_default();
    let is_teams_event = raw.event_type == Some(EVENT_TYPE_TEAMS)
        || raw
            .team_roster_size
            .as_ref()
            .and_then(|t| t.max_players)
            .is_some_and(|n| n > 1);

    Event {
        id: raw.id.clone().map(|id| id.into_string()).unwrap_or_default(),
        slug: raw
            .slug
            .clone()
            .unwrap_or_else(|| format!("{}/event/{}", tournament.slug, name)),
        name,
        num_entrants: raw.num_entrants.unwrap_or(0),
        is_teams_event,
        activity_state: raw
            .state
            .as_deref()
            .map_or(ActivityState::Unknown, ActivityState::parse),
        start_time: raw
            .start_at
            .and_then(timestamp)
            .unwrap_or(tournament.start_time),
        tournament_slug: tournament.slug.clone(),
    }
}

fn map_standing(raw: &WireStanding) -> Standing {
    Standing {
        placement: raw.placement,
        discriminator: extract_discriminator(raw),
    }
}

/// entrant → first participant → user → discriminator. Any missing link is
/// "no placement found" rather than an error.
pub fn extract_discriminator(raw: &WireStanding) -> Option<String> {
    raw.entrant
        .as_ref()?
        .participants
        .as_ref()?
        .first()?
        .user
        .as_ref()?
        .discriminator
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::startgg::{WireEntrant, WireId, WireParticipant, WireParticipantUser};
    use chrono::TimeZone;
    use mockito::Matcher;

    fn tournament() -> Tournament {
        Tournament {
            slug: "tournament/spring-open".into(),
            name: "Spring Open".into(),
            start_time: Utc.with_ymd_and_hms(2023, 2, 1, 18, 0, 0).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn map_tournament_requires_slug_and_start() {
        let raw = WireTournament {
            slug: None,
            start_at: Some(1_675_274_400),
            ..Default::default()
        };
        assert!(map_tournament(raw).is_none());

        let raw = WireTournament {
            slug: Some("tournament/x".into()),
            start_at: None,
            ..Default::default()
        };
        assert!(map_tournament(raw).is_none());
    }

    #[test]
    fn map_tournament_fills_location_and_flags() {
        let raw = WireTournament {
            id: Some(WireId::Number(42)),
            name: Some("Spring Open".into()),
            slug: Some("tournament/spring-open".into()),
            start_at: Some(1_675_274_400),
            is_online: Some(false),
            city: Some("Louisville".into()),
            addr_state: Some("KY".into()),
        };
        let t = map_tournament(raw).expect("complete tournament should map");
        assert_eq!(t.id, "42");
        assert_eq!(t.state, "KY");
        assert!(!t.is_online);
        assert_eq!(t.start_time, Utc.with_ymd_and_hms(2023, 2, 1, 18, 0, 0).unwrap());
        assert_eq!(t.short_slug(), "spring-open");
    }

    #[test]
    fn map_event_detects_team_events() {
        let t = tournament();
        let by_type = WireEvent { event_type: Some(5), ..Default::default() };
        assert!(map_event(&by_type, &t).is_teams_event);

        let by_roster = WireEvent {
            event_type: Some(1),
            team_roster_size: Some(crate::startgg::WireTeamRosterSize { max_players: Some(2) }),
            ..Default::default()
        };
        assert!(map_event(&by_roster, &t).is_teams_event);

        let singles = WireEvent { event_type: Some(1), ..Default::default() };
        assert!(!map_event(&singles, &t).is_teams_event);
    }

    #[test]
    fn map_event_falls_back_to_tournament_start() {
        let t = tournament();
        let raw = WireEvent {
            name: Some("Singles".into()),
            state: Some("ACTIVE".into()),
            num_entrants: Some(16),
            ..Default::default()
        };
        let event = map_event(&raw, &t);
        assert_eq!(event.start_time, t.start_time);
        assert_eq!(event.activity_state, ActivityState::Active);
        assert_eq!(event.tournament_slug, t.slug);
        assert_eq!(event.slug, "tournament/spring-open/event/Singles");
    }

    #[test]
    fn map_event_without_state_is_unknown() {
        let raw = WireEvent { name: Some("Singles".into()), ..Default::default() };
        assert_eq!(map_event(&raw, &tournament()).activity_state, ActivityState::Unknown);

        let created = WireEvent { state: Some("CREATED".into()), ..Default::default() };
        assert_eq!(map_event(&created, &tournament()).activity_state, ActivityState::Created);
    }

    #[test]
    fn discriminator_extraction_tolerates_missing_links() {
        assert_eq!(extract_discriminator(&WireStanding::default()), None);

        let no_participants = WireStanding {
            placement: Some(1),
            entrant: Some(WireEntrant { participants: Some(vec![]) }),
        };
        assert_eq!(extract_discriminator(&no_participants), None);

        let no_user = WireStanding {
            placement: Some(2),
            entrant: Some(WireEntrant {
                participants: Some(vec![WireParticipant { user: None }]),
            }),
        };
        assert_eq!(extract_discriminator(&no_user), None);

        let full = WireStanding {
            placement: Some(3),
            entrant: Some(WireEntrant {
                participants: Some(vec![WireParticipant {
                    user: Some(WireParticipantUser { discriminator: Some("1111".into()) }),
                }]),
            }),
        };
        assert_eq!(extract_discriminator(&full).as_deref(), Some("1111"));
    }

    #[test]
    fn activity_state_parsing() {
        assert_eq!(ActivityState::parse("CREATED"), ActivityState::Created);
        assert_eq!(ActivityState::parse("COMPLETED"), ActivityState::Completed);
        assert_eq!(ActivityState::parse("SOMETHING_NEW"), ActivityState::Unknown);
    }

    // -----------------------------------------------------------------------
    // HTTP round-trips against a mock server
    // -----------------------------------------------------------------------

    #[test]
    fn fetch_user_tournaments_sends_bearer_and_maps_page() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::PartialJson(json!({
                "variables": { "userId": "U1", "page": 2, "perPage": 25 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":{"user":{"player":{"gamerTag":"Alice"},"tournaments":{"nodes":[
                    {"id":1,"name":"Spring Open","slug":"tournament/spring-open","startAt":1675274400,
                     "isOnline":false,"city":"Louisville","addrState":"KY"},
                    {"id":2,"name":"No Slug","startAt":1675274400}
                ]}}}}"#,
            )
            .create();

        let api = StartggApi::new(&server.url(), "secret\n");
        let page = api.fetch_user_tournaments("U1", 2, 25).expect("page should decode");

        mock.assert();
        assert_eq!(page.gamer_tag.as_deref(), Some("Alice"));
        assert_eq!(page.tournaments.len(), 1);
        assert_eq!(page.node_count, 2);
        assert_eq!(page.tournaments[0].slug, "tournament/spring-open");
    }

    #[test]
    fn errors_field_becomes_graphql_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"errors":[{"message":"Rate limit exceeded"}],"data":null}"#)
            .create();

        let api = StartggApi::new(&server.url(), "t");
        let err = api.fetch_user_tournaments("U1", 1, 10).unwrap_err();
        match err {
            ApiError::Graphql(messages) => assert_eq!(messages, vec!["Rate limit exceeded"]),
            other => panic!("expected GraphQL error, got {other}"),
        }
    }

    #[test]
    fn http_failure_becomes_api_error() {
        let mut server = mockito::Server::new();
        server.mock("POST", "/").with_status(500).create();

        let api = StartggApi::new(&server.url(), "t");
        let err = api.fetch_tournament_events(&tournament()).unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)));
    }

    #[test]
    fn fetch_event_standings_clamps_page_size() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "variables": { "eventId": "77", "perPage": 199 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":{"event":{"standings":{"nodes":[
                    {"placement":1,"entrant":{"participants":[{"user":{"discriminator":"aaaa"}}]}},
                    {"placement":2,"entrant":{"participants":[{"user":null}]}}
                ]}}}}"#,
            )
            .create();

        let api = StartggApi::new(&server.url(), "t");
        let standings = api.fetch_event_standings("77", 500).expect("standings should decode");

        mock.assert();
        assert_eq!(
            standings,
            vec![
                Standing { placement: Some(1), discriminator: Some("aaaa".into()) },
                Standing { placement: Some(2), discriminator: None },
            ]
        );
    }
}
