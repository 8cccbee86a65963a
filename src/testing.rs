//! In-memory [`Gateway`] for exercising the pipeline without a network.

use chrono::{DateTime, TimeZone, Utc};
use startgg_api::client::{ApiError, ApiResult};
use startgg_api::gateway::Gateway;
use startgg_api::{ActivityState, Event, Standing, Tournament, UserTournamentsPage};
use std::collections::HashMap;

pub enum FakePage {
    Page(UserTournamentsPage),
    Errors(&'static str),
}

#[derive(Default)]
pub struct FakeGateway {
    pages: HashMap<String, Vec<FakePage>>,
    events: HashMap<String, Vec<Event>>,
    standings: HashMap<String, Vec<Standing>>,
    /// Every query issued, e.g. "user U1 p2", "events tournament/x", "standings 7".
    pub calls: Vec<String>,
}

impl FakeGateway {
    pub fn with_page(self, user_id: &str, gamer_tag: &str, tournaments: Vec<Tournament>) -> Self {
        let node_count = tournaments.len();
        self.with_partial_page(user_id, gamer_tag, tournaments, node_count)
    }

    /// A page where `node_count` entries came back but only `tournaments`
    /// could be mapped.
    pub fn with_partial_page(
        mut self,
        user_id: &str,
        gamer_tag: &str,
        tournaments: Vec<Tournament>,
        node_count: usize,
    ) -> Self {
        self.pages
            .entry(user_id.to_owned())
            .or_default()
            .push(FakePage::Page(UserTournamentsPage {
                gamer_tag: Some(gamer_tag.to_owned()),
                tournaments,
                node_count,
            }));
        self
    }

    pub fn with_error_page(mut self, user_id: &str, message: &'static str) -> Self {
        self.pages
            .entry(user_id.to_owned())
            .or_default()
            .push(FakePage::Errors(message));
        self
    }

    pub fn with_events(mut self, tournament_slug: &str, events: Vec<Event>) -> Self {
        self.events.insert(tournament_slug.to_owned(), events);
        self
    }

    pub fn with_standings(mut self, event_id: &str, standings: Vec<Standing>) -> Self {
        self.standings.insert(event_id.to_owned(), standings);
        self
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls.iter().any(|c| c == call)
    }
}

impl Gateway for FakeGateway {
    fn user_tournaments(
        &mut self,
        user_id: &str,
        page: u32,
        _per_page: u32,
    ) -> ApiResult<UserTournamentsPage> {
        self.calls.push(format!("user {user_id} p{page}"));
        let idx = page.saturating_sub(1) as usize;
        match self.pages.get(user_id).and_then(|pages| pages.get(idx)) {
            Some(FakePage::Page(p)) => Ok(p.clone()),
            Some(FakePage::Errors(message)) => Err(ApiError::Graphql(vec![message.to_string()])),
            None => Ok(UserTournamentsPage::default()),
        }
    }

    fn tournament_events(&mut self, tournament: &Tournament) -> ApiResult<Vec<Event>> {
        self.calls.push(format!("events {}", tournament.slug));
        self.events
            .get(&tournament.slug)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("tournament {}", tournament.slug)))
    }

    fn event_standings(&mut self, event_id: &str, _per_page: u32) -> ApiResult<Vec<Standing>> {
        self.calls.push(format!("standings {event_id}"));
        Ok(self.standings.get(event_id).cloned().unwrap_or_default())
    }
}

pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 17, 0, 0).unwrap()
}

pub fn tournament(slug: &str, state: &str, start: DateTime<Utc>) -> Tournament {
    Tournament {
        id: slug.to_owned(),
        slug: slug.to_owned(),
        name: slug.trim_start_matches("tournament/").to_owned(),
        start_time: start,
        city: "Louisville".into(),
        state: state.to_owned(),
        ..Default::default()
    }
}

pub fn event(tournament: &Tournament, id: &str, name: &str, entrants: u32) -> Event {
    Event {
        id: id.to_owned(),
        slug: format!("{}/event/{}", tournament.slug, name.to_lowercase().replace(' ', "-")),
        name: name.to_owned(),
        num_entrants: entrants,
        is_teams_event: false,
        activity_state: ActivityState::Active,
        start_time: tournament.start_time,
        tournament_slug: tournament.slug.clone(),
    }
}

pub fn standing(placement: u32, discriminator: Option<&str>) -> Standing {
    Standing {
        placement: Some(placement),
        discriminator: discriminator.map(str::to_owned),
    }
}
