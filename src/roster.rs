use anyhow::{Context, anyhow};
use std::path::Path;

const NAME_DELIMITER: &str = "---";
const DISCRIMINATOR_DELIMITER: &str = "***";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub user_id: String,
    pub discriminator: String,
}

/// Tracked players in file order.
///
/// Tournament scanning is keyed by user id and placement rows by name. A
/// repeated key keeps its first position and takes the later line's values,
/// so two names sharing one user id are scanned once but both keep a row in
/// the placement sheet.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    placement_rows: Vec<RosterEntry>,
}

impl Roster {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read roster {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid roster {}", path.display()))
    }

    /// Parses `<name>---<user_id>***<discriminator>` lines. `#` lines are
    /// comments and blank lines are ignored. Any other malformed line fails the
    /// whole roster.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut roster = Roster::default();
        for (idx, line) in content.lines().enumerate() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let entry = parse_line(line.trim())
                .ok_or_else(|| anyhow!("line {}: expected name---id***discriminator, got {line:?}", idx + 1))?;
            roster.insert(entry);
        }
        Ok(roster)
    }

    fn insert(&mut self, entry: RosterEntry) {
        upsert(&mut self.placement_rows, entry.clone(), |a, b| a.name == b.name);
        upsert(&mut self.entries, entry, |a, b| a.user_id == b.user_id);
    }

    /// One entry per user id.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// One entry per player name, in roster order.
    pub fn placement_rows(&self) -> &[RosterEntry] {
        &self.placement_rows
    }

    /// Discriminators of the placement rows, in roster order.
    pub fn discriminators(&self) -> impl Iterator<Item = &str> {
        self.placement_rows.iter().map(|e| e.discriminator.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn upsert(list: &mut Vec<RosterEntry>, entry: RosterEntry, same: impl Fn(&RosterEntry, &RosterEntry) -> bool) {
    match list.iter_mut().find(|e| same(e, &entry)) {
        Some(existing) => *existing = entry,
        None => list.push(entry),
    }
}

fn parse_line(line: &str) -> Option<RosterEntry> {
    let (name, rest) = line.split_once(NAME_DELIMITER)?;
    let (user_id, discriminator) = rest.split_once(DISCRIMINATOR_DELIMITER)?;
    if rest.contains(NAME_DELIMITER) || discriminator.contains(DISCRIMINATOR_DELIMITER) {
        return None;
    }
    Some(RosterEntry {
        name: name.to_owned(),
        user_id: user_id.to_owned(),
        discriminator: discriminator.to_owned(),
    })
}

/// One bearer token per line. Blank lines are skipped.
pub fn load_tokens(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read tokens {}", path.display()))?;
    let tokens = parse_tokens(&content);
    if tokens.is_empty() {
        return Err(anyhow!("no tokens found in {}", path.display()));
    }
    Ok(tokens)
}

pub fn parse_tokens(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}
