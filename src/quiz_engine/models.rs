use std::collections::HashMap;
use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Roster columns
// ---------------------------------------------------------------------------

/// Column names consumed from the roster CSV. Other columns are kept on the
/// record but never read.
pub mod columns {
    pub const CLUB_NAME: &str = "Club Name";
    pub const PLAYER_NAME: &str = "Player Name";
    pub const CLUB_BADGE_URL: &str = "Club Badge URL";
    pub const PLAYER_IMAGE_URL: &str = "Player Image URL";
    pub const NATIONALITY_1: &str = "Nationality 1";
    pub const NATIONALITY_1_FLAG_URL: &str = "Nationality 1 Flag URL";
    pub const NATIONALITY_2: &str = "Nationality 2";
    pub const NATIONALITY_2_FLAG_URL: &str = "Nationality 2 Flag URL";
    pub const POSITION: &str = "Position";
    pub const JERSEY_NUMBER: &str = "Jersey Number";
}

/// Build the stable player id (`"<club>::<player>"`).
pub fn player_id(club: &str, name: &str) -> String {
    format!("{}::{}", club, name)
}

// ---------------------------------------------------------------------------
// Player records
// ---------------------------------------------------------------------------

/// One roster row. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    fields: HashMap<String, String>,
}

impl PlayerRecord {
    /// Wrap a parsed field mapping and derive its id.
    pub fn from_fields(fields: HashMap<String, String>) -> Self {
        let id = {
            let get = |k: &str| fields.get(k).map(String::as_str).unwrap_or("");
            player_id(get(columns::CLUB_NAME), get(columns::PLAYER_NAME))
        };
        PlayerRecord { id, fields }
    }

    /// Value of a column, or `""` when the row did not carry it.
    pub fn field(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    pub fn club(&self) -> &str {
        self.field(columns::CLUB_NAME)
    }

    pub fn name(&self) -> &str {
        self.field(columns::PLAYER_NAME)
    }

    pub fn badge_url(&self) -> &str {
        self.field(columns::CLUB_BADGE_URL)
    }

    pub fn image_url(&self) -> &str {
        self.field(columns::PLAYER_IMAGE_URL)
    }

    pub fn position(&self) -> &str {
        self.field(columns::POSITION)
    }

    pub fn jersey_number(&self) -> &str {
        self.field(columns::JERSEY_NUMBER)
    }

    /// First nationality always, second only when a flag URL is present.
    pub fn nationalities(&self) -> Vec<Nationality> {
        let mut out = vec![Nationality {
            name: self.field(columns::NATIONALITY_1).to_string(),
            flag_url: self.field(columns::NATIONALITY_1_FLAG_URL).to_string(),
        }];
        let second_flag = self.field(columns::NATIONALITY_2_FLAG_URL);
        if !second_flag.is_empty() {
            out.push(Nationality {
                name: self.field(columns::NATIONALITY_2).to_string(),
                flag_url: second_flag.to_string(),
            });
        }
        out
    }

    /// Everything the presentation layer shows for a question target.
    pub fn card(&self) -> PlayerCard {
        PlayerCard {
            id: self.id.clone(),
            name: self.name().to_string(),
            club: self.club().to_string(),
            badge_url: self.badge_url().to_string(),
            image_url: self.image_url().to_string(),
            nationalities: self.nationalities(),
            position: self.position().to_string(),
            jersey_number: self.jersey_number().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nationality {
    pub name: String,
    pub flag_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCard {
    pub id: String,
    pub name: String,
    pub club: String,
    pub badge_url: String,
    pub image_url: String,
    pub nationalities: Vec<Nationality>,
    pub position: String,
    pub jersey_number: String,
}

// ---------------------------------------------------------------------------
// Mastery
// ---------------------------------------------------------------------------

/// Per-player mastery counter, always in 0..=2 where 2 = learned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Mastery(u8);

impl From<u8> for Mastery {
    fn from(raw: u8) -> Self {
        Mastery::new(raw)
    }
}

impl From<Mastery> for u8 {
    fn from(m: Mastery) -> Self {
        m.0
    }
}

impl Mastery {
    pub const NEW: Mastery = Mastery(0);
    pub const LEARNED: Mastery = Mastery(2);

    /// Clamp any raw count into range.
    pub fn new(raw: u8) -> Self {
        Mastery(raw.min(Self::LEARNED.0))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_learned(self) -> bool {
        self >= Self::LEARNED
    }

    /// One more correct answer, saturating at learned.
    pub fn bumped(self) -> Self {
        Mastery::new(self.0.saturating_add(1))
    }
}

impl fmt::Display for Mastery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Render snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubEntry {
    pub name: String,
    pub badge_url: String,
    pub selected: bool,
}

/// Visual state of one answer button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionMark {
    #[default]
    Plain,
    /// The user picked this and it was right.
    Correct,
    /// The user picked this and it was wrong.
    Wrong,
    /// The true target, revealed after a wrong pick.
    ShowCorrect,
}

impl fmt::Display for OptionMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionMark::Plain       => write!(f, ""),
            OptionMark::Correct     => write!(f, "correct"),
            OptionMark::Wrong       => write!(f, "wrong"),
            OptionMark::ShowCorrect => write!(f, "show-correct"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerChoice {
    pub id: String,
    pub name: String,
    pub mark: OptionMark,
}

/// What the presentation layer should currently show in the quiz body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundView {
    Question {
        target: PlayerCard,
        options: Vec<AnswerChoice>,
    },
    /// No eligible player is left for the selected clubs.
    Finished { clubs: Vec<String> },
}

impl RoundView {
    pub fn is_finished(&self) -> bool {
        matches!(self, RoundView::Finished { .. })
    }
}

/// Result of an accepted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub chosen_id: String,
    pub target_id: String,
    pub is_correct: bool,
    /// Target's mastery after the answer was scored.
    pub mastery: Mastery,
    /// Logical time at which the next round becomes due.
    pub resume_at_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub learned: usize,
    pub total: usize,
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} gelernt", self.learned, self.total)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Relative name of the roster resource fetched at startup.
    pub roster_name: String,
    /// Key the progress map is persisted under.
    pub storage_key: String,
    /// Upper bound on answer options (target included).
    pub options_per_question: usize,
    pub correct_delay_ms: u64,
    pub wrong_delay_ms: u64,
    /// `Some(seed)` makes every round reproducible.
    pub rng_seed: Option<u64>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        QuizConfig {
            roster_name: "spieler.csv".to_string(),
            storage_key: "blsl_quiz".to_string(),
            options_per_question: 4,
            correct_delay_ms: 600,
            wrong_delay_ms: 1200,
            rng_seed: None,
        }
    }
}

impl QuizConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}
