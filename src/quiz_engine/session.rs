//! Command handlers between a presentation layer and the engine.
//!
//! The presenter only receives snapshots; all intent flows back in through
//! the `on_*` methods. Timers are the caller's business: after an answer,
//! call [`QuizSession::advance`] with the current logical time until the
//! engine reports the next round.

use crate::quiz_engine::{
    engine::QuizEngine,
    error::FetchError,
    models::{AnswerChoice, AnswerOutcome, ClubEntry, PlayerCard, ProgressSummary, QuizConfig, RoundView},
    progress::ProgressStore,
    roster::{Roster, RosterSource},
    storage::KeyValueStore,
};

/// Rendering surface driven by a [`QuizSession`].
pub trait Presenter {
    fn render_club_selector(&mut self, clubs: &[ClubEntry], all_selected: bool);
    fn render_question(&mut self, target: &PlayerCard, options: &[AnswerChoice]);
    fn render_progress(&mut self, summary: ProgressSummary);
    fn render_completion(&mut self, clubs: &[String]);
    /// Marks on the current options changed after an answer.
    fn render_feedback(&mut self, _outcome: &AnswerOutcome, _options: &[AnswerChoice]) {}
    /// Startup could not complete.
    fn render_error(&mut self, error: &FetchError);
}

pub struct QuizSession<S: KeyValueStore, P: Presenter> {
    engine: QuizEngine<S>,
    presenter: P,
    config: QuizConfig,
}

impl<S: KeyValueStore, P: Presenter> QuizSession<S, P> {
    /// Load progress, fetch the roster and render the first screen.
    ///
    /// A fetch failure is rendered through the presenter and returned.
    pub fn start(
        source: &impl RosterSource,
        store: S,
        config: QuizConfig,
        mut presenter: P,
    ) -> Result<Self, FetchError> {
        let progress = ProgressStore::load(store, config.storage_key.clone());
        let roster = match Roster::load(source, &config.roster_name) {
            Ok(roster) => roster,
            Err(e) => {
                log::error!("Cannot start quiz: {}", e);
                presenter.render_error(&e);
                return Err(e);
            }
        };
        let engine = QuizEngine::new(roster, progress, &config);
        let mut session = QuizSession { engine, presenter, config };
        session.render_all();
        Ok(session)
    }

    pub fn engine(&self) -> &QuizEngine<S> {
        &self.engine
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn on_club_toggle(&mut self, club: &str) {
        let view = self.engine.toggle_club(club);
        self.render_selection_change(view);
    }

    pub fn on_select_all_toggle(&mut self) {
        let view = self.engine.toggle_all();
        self.render_selection_change(view);
    }

    /// Returns the outcome when the answer was accepted.
    pub fn on_answer_chosen(&mut self, option_id: &str, now_ms: u64) -> Option<AnswerOutcome> {
        let outcome = self.engine.submit_answer(option_id, now_ms)?;
        if let RoundView::Question { options, .. } = self.engine.current_view() {
            self.presenter.render_feedback(&outcome, &options);
        }
        if outcome.is_correct {
            self.presenter.render_progress(self.engine.summary());
        }
        Some(outcome)
    }

    /// Fire the pending transition if it is due. Returns true when a new
    /// screen was rendered.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        match self.engine.tick(now_ms) {
            Some(view) => {
                self.render_view(&view);
                true
            }
            None => false,
        }
    }

    pub fn on_restart_requested(&mut self) {
        let view = self.engine.restart();
        self.presenter.render_progress(self.engine.summary());
        self.render_view(&view);
    }

    /// Re-fetch the roster and start over with every club selected.
    pub fn on_change_teams_requested(&mut self, source: &impl RosterSource) -> Result<(), FetchError> {
        let roster = match Roster::load(source, &self.config.roster_name) {
            Ok(roster) => roster,
            Err(e) => {
                log::error!("Cannot reload roster: {}", e);
                self.presenter.render_error(&e);
                return Err(e);
            }
        };
        self.engine.replace_roster(roster);
        self.render_all();
        Ok(())
    }

    fn render_selection_change(&mut self, view: RoundView) {
        self.presenter
            .render_club_selector(&self.engine.catalog(), self.engine.selection().is_all_selected());
        self.presenter.render_progress(self.engine.summary());
        self.render_view(&view);
    }

    fn render_all(&mut self) {
        let view = self.engine.current_view();
        self.render_selection_change(view);
    }

    fn render_view(&mut self, view: &RoundView) {
        match view {
            RoundView::Question { target, options } => self.presenter.render_question(target, options),
            RoundView::Finished { clubs } => self.presenter.render_completion(clubs),
        }
    }
}
