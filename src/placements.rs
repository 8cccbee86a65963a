use crate::roster::Roster;
use log::{debug, error, info, warn};
use startgg_api::Tournament;
use startgg_api::gateway::Gateway;
use std::collections::HashMap;

/// Sparse player × tournament grid. Every row has exactly one slot per
/// column; `None` means the player was not found in that tournament's
/// standings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlacementMatrix {
    /// Tournament slugs, in collection order.
    columns: Vec<String>,
    /// (discriminator, slots) in roster order.
    rows: Vec<(String, Vec<Option<u32>>)>,
    by_discriminator: HashMap<String, usize>,
}

impl PlacementMatrix {
    fn new<'a>(discriminators: impl Iterator<Item = &'a str>) -> Self {
        let mut matrix = Self::default();
        for d in discriminators {
            if matrix.by_discriminator.contains_key(d) {
                continue;
            }
            matrix.by_discriminator.insert(d.to_owned(), matrix.rows.len());
            matrix.rows.push((d.to_owned(), Vec::new()));
        }
        matrix
    }

    fn push_column(&mut self, slug: &str) {
        self.columns.push(slug.to_owned());
        for (_, slots) in &mut self.rows {
            slots.push(None);
        }
    }

    /// Overwrite the newest column's slot for a tracked discriminator.
    /// Untracked discriminators are ignored.
    fn record(&mut self, discriminator: &str, placement: u32) -> bool {
        let Some(&idx) = self.by_discriminator.get(discriminator) else {
            return false;
        };
        match self.rows[idx].1.last_mut() {
            Some(slot) => {
                *slot = Some(placement);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row(&self, discriminator: &str) -> Option<&[Option<u32>]> {
        self.by_discriminator
            .get(discriminator)
            .map(|&idx| self.rows[idx].1.as_slice())
    }

    #[cfg(test)]
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<u32>])> {
        self.rows.iter().map(|(d, slots)| (d.as_str(), slots.as_slice()))
    }
}

/// Build the placement grid for `tournaments`, one column each, in the order
/// given. The caller must pass the same order used for report headers.
///
/// Only the first retained event of each tournament is read: a tournament
/// with several eligible events reports the first one's standings.
pub fn collect_placements(
    tournaments: &[Tournament],
    roster: &Roster,
    gateway: &mut impl Gateway,
    per_page: u32,
) -> PlacementMatrix {
    info!("Getting placement data...");
    let mut matrix = PlacementMatrix::new(roster.discriminators());

    for tournament in tournaments {
        debug!("---{}", tournament.name);
        matrix.push_column(&tournament.slug);

        let Some(event) = tournament.events.first() else {
            warn!("{} has no events, leaving its column empty", tournament.slug);
            continue;
        };

        let standings = match gateway.event_standings(&event.id, per_page) {
            Ok(standings) => standings,
            Err(e) => {
                error!("standings for {} ({}): {e}", tournament.slug, event.name);
                continue;
            }
        };

        for standing in standings {
            if let (Some(discriminator), Some(placement)) = (standing.discriminator, standing.placement)
                && matrix.record(&discriminator, placement)
            {
                debug!("{discriminator} placed {placement} at {}", tournament.name);
            }
        }
    }

    info!("Complete");
    matrix
}
