//! # club_quiz
//!
//! An offline "who is this player?" flashcard quiz engine.
//!
//! A roster of players is loaded from a CSV file. The user picks one or more
//! clubs and is repeatedly shown a player photo with up to four names from
//! the same club to choose from. Each correct identification raises that
//! player's mastery counter; after two correct answers the player counts as
//! learned and stops being asked. Progress survives restarts through a
//! key-value string store.
//!
//! ## How it works
//!
//! 1. A [`RosterSource`] hands over the CSV text (`spieler.csv` by default),
//!    which is parsed into [`PlayerRecord`]s keyed `"<club>::<player>"`.
//! 2. A [`ProgressStore`] reads the persisted mastery map from any
//!    [`KeyValueStore`].
//! 3. [`QuizEngine`] filters the roster by the selected clubs, picks an
//!    unlearned target, samples distractors from the same club and exposes a
//!    [`RoundView`] snapshot.
//! 4. [`QuizSession`] wires the engine to a [`Presenter`] and turns user
//!    intents (`on_club_toggle`, `on_answer_chosen`, ...) into engine calls.
//!
//! ## Key features
//!
//! - **Deterministic**: set `QuizConfig::rng_seed` to reproduce every round.
//! - **No clock inside**: feedback delays are logical timestamps, advanced by
//!   the caller through `tick` / `advance`.
//! - **Best-effort persistence**: storage failures are logged and the session
//!   keeps going from memory.
//!
//! ## Quick start
//!
//! ```rust
//! use club_quiz::{MemoryStore, ProgressStore, QuizConfig, QuizEngine, Roster, RoundView};
//!
//! let roster = Roster::from_csv("Club Name,Player Name\nFCB,Anna\nFCB,Bea\nFCB,Cleo\n");
//! let progress = ProgressStore::load(MemoryStore::new(), "blsl_quiz");
//! let mut engine = QuizEngine::new(roster, progress, &QuizConfig::default().with_seed(42));
//!
//! if let RoundView::Question { target, options } = engine.current_view() {
//!     println!("Who is this? ({} options)", options.len());
//!     let outcome = engine.submit_answer(&target.id, 0).unwrap();
//!     assert!(outcome.is_correct);
//!     engine.tick(outcome.resume_at_ms);
//! }
//! ```

pub mod client_adapter;
pub mod quiz_engine;

// Convenience re-exports so callers can use `club_quiz::QuizEngine`
// directly without reaching into `quiz_engine::`.
pub use client_adapter::to_client_state;
pub use quiz_engine::{
    AnswerChoice, AnswerOutcome, ClubEntry, DirectorySource, FetchError, FileStore,
    KeyValueStore, Mastery, MemoryStore, Nationality, OptionMark, Phase, PlayerCard,
    PlayerRecord, Presenter, ProgressStore, ProgressSummary, QuizConfig, QuizEngine,
    QuizSession, Roster, RosterSource, RoundView, SelectionSet, StaticSource, StoreError,
};
