use serde::{Deserialize, Serialize};

/// Clubs the user is currently quizzed on, kept in selection order.
///
/// Not persisted; a fresh session selects every known club.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    clubs: Vec<String>,
    known: Vec<String>,
}

impl SelectionSet {
    /// Every club in `known` selected.
    pub fn all_of(known: &[String]) -> Self {
        SelectionSet { clubs: known.to_vec(), known: known.to_vec() }
    }

    pub fn contains(&self, club: &str) -> bool {
        self.clubs.iter().any(|c| c == club)
    }

    /// Add the club if absent, remove it if present.
    pub fn toggle(&mut self, club: &str) {
        if self.contains(club) {
            self.clubs.retain(|c| c != club);
        } else {
            self.clubs.push(club.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.clubs = self.known.clone();
    }

    pub fn select_none(&mut self) {
        self.clubs.clear();
    }

    pub fn is_all_selected(&self) -> bool {
        self.known.iter().all(|k| self.contains(k))
    }

    /// Deselect everything when all clubs are selected, otherwise select all.
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.select_none();
        } else {
            self.select_all();
        }
    }

    pub fn clubs(&self) -> &[String] {
        &self.clubs
    }

    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }
}
