//! Roster store: the parsed player table plus the club catalog derived from it.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::quiz_engine::{
    csv,
    error::FetchError,
    models::{ClubEntry, PlayerRecord},
    selection::SelectionSet,
};

/// Retrieval transport for the roster text.
pub trait RosterSource {
    fn fetch(&self, name: &str) -> Result<String, FetchError>;
}

/// Reads roster resources relative to a base directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    base: PathBuf,
}

impl DirectorySource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        DirectorySource { base: base.into() }
    }
}

impl RosterSource for DirectorySource {
    fn fetch(&self, name: &str) -> Result<String, FetchError> {
        let path = self.base.join(name);
        let bytes = std::fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => FetchError::NotFound { name: name.to_string() },
            _ => FetchError::Io { name: name.to_string(), source },
        })?;
        String::from_utf8(bytes).map_err(|_| FetchError::InvalidEncoding { name: name.to_string() })
    }
}

/// In-memory source, handy for embedding a roster or for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub text: String,
}

impl RosterSource for StaticSource {
    fn fetch(&self, _name: &str) -> Result<String, FetchError> {
        Ok(self.text.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<PlayerRecord>,
}

impl Roster {
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        Roster { players }
    }

    /// Parse CSV text. Never fails; malformed rows come through lossy.
    pub fn from_csv(text: &str) -> Self {
        Roster::new(csv::parse(text).into_iter().map(PlayerRecord::from_fields).collect())
    }

    /// Fetch `name` from `source` and parse it.
    pub fn load(source: &impl RosterSource, name: &str) -> Result<Self, FetchError> {
        let text = source.fetch(name)?;
        let roster = Roster::from_csv(&text);
        log::info!(
            "Loaded roster {}: {} players in {} clubs",
            name,
            roster.len(),
            roster.club_names().len()
        );
        Ok(roster)
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Distinct club names, first-seen order.
    pub fn club_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for p in &self.players {
            if !names.iter().any(|n| n == p.club()) {
                names.push(p.club().to_string());
            }
        }
        names
    }

    /// Badge for a club; the first row of that club wins.
    pub fn badge_url(&self, club: &str) -> Option<&str> {
        self.players.iter().find(|p| p.club() == club).map(|p| p.badge_url())
    }

    /// Club catalog annotated with the current selection.
    pub fn catalog(&self, selection: &SelectionSet) -> Vec<ClubEntry> {
        self.club_names()
            .into_iter()
            .map(|name| ClubEntry {
                badge_url: self.badge_url(&name).unwrap_or("").to_string(),
                selected: selection.contains(&name),
                name,
            })
            .collect()
    }

    /// Players of the selected clubs, roster order.
    pub fn in_selection<'a>(
        &'a self,
        selection: &'a SelectionSet,
    ) -> impl Iterator<Item = &'a PlayerRecord> + 'a {
        self.players.iter().filter(move |p| selection.contains(p.club()))
    }
}
