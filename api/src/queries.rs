//! GraphQL documents sent to https://api.start.gg/gql/alpha.

/// Paginated, most-recent-first tournament history of one user.
pub const TOURNAMENTS_BY_USER: &str = r#"
query TournamentsByUser($userId: ID!, $page: Int!, $perPage: Int!) {
  user(id: $userId) {
    player {
      gamerTag
    }
    tournaments(query: { page: $page, perPage: $perPage }) {
      nodes {
        id
        name
        slug
        startAt
        isOnline
        city
        addrState
      }
    }
  }
}
"#;

pub const EVENTS_BY_TOURNAMENT: &str = r#"
query EventsByTournament($slug: String!) {
  tournament(slug: $slug) {
    events {
      id
      name
      slug
      numEntrants
      type
      teamRosterSize {
        maxPlayers
      }
      state
      startAt
    }
  }
}
"#;

/// `perPage` above 199 makes start.gg reject the query as too complex.
pub const EVENT_STANDINGS: &str = r#"
query EventStandings($eventId: ID!, $page: Int!, $perPage: Int!) {
  event(id: $eventId) {
    standings(query: { page: $page, perPage: $perPage }) {
      nodes {
        placement
        entrant {
          participants {
            user {
              discriminator
            }
          }
        }
      }
    }
  }
}
"#;
