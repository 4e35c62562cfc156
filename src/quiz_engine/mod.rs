//! Core quiz engine: roster loading, progress tracking, and the round state machine.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | Shared types: player records, mastery, render snapshots, config |
//! | `csv`       | Lossy quote-toggling CSV reader for the roster file |
//! | `roster`    | Player table, club catalog, roster sources |
//! | `storage`   | Key-value string persistence (memory and file backed) |
//! | `progress`  | Per-player mastery counters persisted as JSON |
//! | `selection` | Clubs currently being quizzed on |
//! | `shuffle`   | Fisher-Yates shuffle and sampling helpers |
//! | `engine`    | Active / Cooldown / Finished round state machine |
//! | `session`   | Command handlers that drive a `Presenter` |
//! | `error`     | Fetch and storage errors |

pub mod csv;
pub mod engine;
pub mod error;
pub mod models;
pub mod progress;
pub mod roster;
pub mod selection;
pub mod session;
pub mod shuffle;
pub mod storage;

pub use engine::{Phase, QuizEngine};
pub use error::{FetchError, StoreError};
pub use models::{
    AnswerChoice, AnswerOutcome, ClubEntry, Mastery, Nationality, OptionMark, PlayerCard,
    PlayerRecord, ProgressSummary, QuizConfig, RoundView,
};
pub use progress::ProgressStore;
pub use roster::{DirectorySource, Roster, RosterSource, StaticSource};
pub use selection::SelectionSet;
pub use session::{Presenter, QuizSession};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
