use crate::client::{ApiError, ApiResult, StartggApi};
use crate::{Event, Standing, Tournament, UserTournamentsPage};
use log::debug;

/// The three logical queries the season pipeline consumes.
///
/// Takes `&mut self` because a call may advance client rotation.
pub trait Gateway {
    fn user_tournaments(
        &mut self,
        user_id: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<UserTournamentsPage>;

    fn tournament_events(&mut self, tournament: &Tournament) -> ApiResult<Vec<Event>>;

    fn event_standings(&mut self, event_id: &str, per_page: u32) -> ApiResult<Vec<Standing>>;
}

/// Round-robin over a fixed pool, advanced once per call.
#[derive(Debug, Clone)]
pub struct ClientRotator<C> {
    clients: Vec<C>,
    next: usize,
}

impl<C> ClientRotator<C> {
    /// Returns `None` for an empty pool.
    pub fn new(clients: Vec<C>) -> Option<Self> {
        if clients.is_empty() {
            return None;
        }
        Some(Self { clients, next: 0 })
    }

    pub fn next_client(&mut self) -> &C {
        let idx = self.next;
        self.next = (self.next + 1) % self.clients.len();
        &self.clients[idx]
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// [`Gateway`] backed by one authenticated client per token, spreading
/// requests across the tokens' rate limits.
#[derive(Debug)]
pub struct QueryGateway {
    rotator: ClientRotator<StartggApi>,
}

impl QueryGateway {
    pub fn new<I, S>(endpoint: &str, tokens: I) -> ApiResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let clients = tokens
            .into_iter()
            .map(|t| StartggApi::new(endpoint, t.as_ref()))
            .collect();
        let rotator = ClientRotator::new(clients)
            .ok_or_else(|| ApiError::Other("no API tokens configured".into()))?;
        debug!("query gateway ready with {} clients", rotator.len());
        Ok(Self { rotator })
    }
}

impl Gateway for QueryGateway {
    fn user_tournaments(
        &mut self,
        user_id: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<UserTournamentsPage> {
        self.rotator
            .next_client()
            .fetch_user_tournaments(user_id, page, per_page)
    }

    fn tournament_events(&mut self, tournament: &Tournament) -> ApiResult<Vec<Event>> {
        self.rotator.next_client().fetch_tournament_events(tournament)
    }

    fn event_standings(&mut self, event_id: &str, per_page: u32) -> ApiResult<Vec<Standing>> {
        self.rotator.next_client().fetch_event_standings(event_id, per_page)
    }
}
