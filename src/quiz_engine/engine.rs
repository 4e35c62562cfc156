//! Round state machine.
//!
//! ```text
//!            reset_round (pool empty)
//!   ┌──────────────────────────────────────┐
//!   │                                      ▼
//! Active ── submit_answer ──► Cooldown ── tick ──► reset_round ──► Active | Finished
//! ```
//!
//! The engine never reads a clock: callers pass logical `now_ms` values, so
//! tests can step time deterministically. While in `Cooldown` every answer is
//! ignored, which is what stops a double click from scoring twice.

use rand::{rngs::StdRng, SeedableRng};

use crate::quiz_engine::{
    models::{
        AnswerChoice, AnswerOutcome, ClubEntry, Mastery, OptionMark, ProgressSummary,
        QuizConfig, RoundView,
    },
    progress::ProgressStore,
    roster::Roster,
    selection::SelectionSet,
    shuffle::{pick, sample, shuffle},
    storage::KeyValueStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A question is showing and answers are accepted.
    Active,
    /// Feedback is showing; the next round is due at `until_ms`.
    Cooldown { until_ms: u64 },
    /// No eligible player left for the current selection.
    Finished,
}

/// Indices into the roster for the round on screen.
#[derive(Debug, Clone)]
struct Round {
    target: usize,
    options: Vec<usize>,
    marks: Vec<OptionMark>,
}

pub struct QuizEngine<S: KeyValueStore> {
    roster: Roster,
    selection: SelectionSet,
    progress: ProgressStore<S>,
    rng: StdRng,
    options_per_question: usize,
    correct_delay_ms: u64,
    wrong_delay_ms: u64,
    phase: Phase,
    round: Option<Round>,
}

impl<S: KeyValueStore> QuizEngine<S> {
    /// Start with every club selected and the first round already picked.
    pub fn new(roster: Roster, progress: ProgressStore<S>, config: &QuizConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let mut engine = QuizEngine {
            selection: SelectionSet::all_of(&roster.club_names()),
            roster,
            progress,
            rng,
            options_per_question: config.options_per_question.max(1),
            correct_delay_ms: config.correct_delay_ms,
            wrong_delay_ms: config.wrong_delay_ms,
            phase: Phase::Finished,
            round: None,
        };
        engine.reset_round();
        engine
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn progress(&self) -> &ProgressStore<S> {
        &self.progress
    }

    pub fn mastery(&self, id: &str) -> Mastery {
        self.progress.get(id)
    }

    /// Ids of players that may become the next target.
    pub fn eligible_ids(&self) -> Vec<&str> {
        self.eligible().into_iter().map(|i| self.roster.players()[i].id.as_str()).collect()
    }

    fn eligible(&self) -> Vec<usize> {
        self.roster
            .players()
            .iter()
            .enumerate()
            .filter(|(_, p)| self.selection.contains(p.club()) && !self.progress.get(&p.id).is_learned())
            .map(|(i, _)| i)
            .collect()
    }

    /// Pick a new target and its options, or finish when the pool is empty.
    pub fn reset_round(&mut self) -> RoundView {
        let eligible = self.eligible();
        let Some(&target) = pick(&eligible, &mut self.rng) else {
            log::debug!("No eligible players for {:?}, quiz finished", self.selection.clubs());
            self.phase = Phase::Finished;
            self.round = None;
            return self.current_view();
        };

        let players = self.roster.players();
        let target_player = &players[target];

        // Distractors come from the whole selected club, learned or not.
        let mut others: Vec<usize> = Vec::new();
        for (i, p) in players.iter().enumerate() {
            if p.club() == target_player.club()
                && self.selection.contains(p.club())
                && p.id != target_player.id
                && !others.iter().any(|&o| players[o].id == p.id)
            {
                others.push(i);
            }
        }

        let mut options = sample(&others, self.options_per_question - 1, &mut self.rng);
        options.push(target);
        shuffle(&mut options, &mut self.rng);

        log::debug!("New round: target {} with {} options", target_player.id, options.len());
        self.round = Some(Round { target, marks: vec![OptionMark::Plain; options.len()], options });
        self.phase = Phase::Active;
        self.current_view()
    }

    /// Snapshot of what the quiz body should show right now.
    pub fn current_view(&self) -> RoundView {
        match &self.round {
            Some(round) if self.phase != Phase::Finished => {
                let players = self.roster.players();
                RoundView::Question {
                    target: players[round.target].card(),
                    options: round
                        .options
                        .iter()
                        .zip(&round.marks)
                        .map(|(&i, &mark)| AnswerChoice {
                            id: players[i].id.clone(),
                            name: players[i].name().to_string(),
                            mark,
                        })
                        .collect(),
                }
            }
            _ => RoundView::Finished { clubs: self.selection.clubs().to_vec() },
        }
    }

    /// Score an answer. Returns `None` when the input is ignored: the engine
    /// is not `Active`, or `chosen_id` is not one of the shown options.
    pub fn submit_answer(&mut self, chosen_id: &str, now_ms: u64) -> Option<AnswerOutcome> {
        if self.phase != Phase::Active {
            log::debug!("Ignoring answer {} while {:?}", chosen_id, self.phase);
            return None;
        }
        let round = self.round.as_mut()?;
        let players = self.roster.players();
        let Some(chosen_slot) = round.options.iter().position(|&i| players[i].id == chosen_id) else {
            log::debug!("Ignoring answer {}: not among the options", chosen_id);
            return None;
        };

        let target_id = players[round.target].id.clone();
        let is_correct = chosen_id == target_id;
        let (mastery, delay) = if is_correct {
            round.marks[chosen_slot] = OptionMark::Correct;
            (self.progress.increment(&target_id), self.correct_delay_ms)
        } else {
            round.marks[chosen_slot] = OptionMark::Wrong;
            if let Some(target_slot) = round.options.iter().position(|&i| i == round.target) {
                round.marks[target_slot] = OptionMark::ShowCorrect;
            }
            (self.progress.get(&target_id), self.wrong_delay_ms)
        };

        let resume_at_ms = now_ms.saturating_add(delay);
        self.phase = Phase::Cooldown { until_ms: resume_at_ms };
        log::debug!("Answer {} for {}: correct={}, mastery={}", chosen_id, target_id, is_correct, mastery);

        Some(AnswerOutcome {
            chosen_id: chosen_id.to_string(),
            target_id,
            is_correct,
            mastery,
            resume_at_ms,
        })
    }

    /// Run the scheduled transition once its time has come.
    pub fn tick(&mut self, now_ms: u64) -> Option<RoundView> {
        match self.phase {
            Phase::Cooldown { until_ms } if now_ms >= until_ms => Some(self.reset_round()),
            _ => None,
        }
    }

    pub fn toggle_club(&mut self, club: &str) -> RoundView {
        self.selection.toggle(club);
        self.reset_round()
    }

    pub fn select_all(&mut self) -> RoundView {
        self.selection.select_all();
        self.reset_round()
    }

    pub fn select_none(&mut self) -> RoundView {
        self.selection.select_none();
        self.reset_round()
    }

    /// "All" button: clear when everything is selected, otherwise select all.
    pub fn toggle_all(&mut self) -> RoundView {
        self.selection.toggle_all();
        self.reset_round()
    }

    /// Forget progress for every player of the selected clubs and start over.
    pub fn restart(&mut self) -> RoundView {
        let ids: Vec<String> = self
            .roster
            .in_selection(&self.selection)
            .map(|p| p.id.clone())
            .collect();
        self.progress.reset_for(&ids);
        self.reset_round()
    }

    /// Swap in a freshly loaded roster: all clubs selected, progress re-read.
    pub fn replace_roster(&mut self, roster: Roster) -> RoundView {
        self.selection = SelectionSet::all_of(&roster.club_names());
        self.roster = roster;
        self.progress.reload();
        self.reset_round()
    }

    /// Learned vs total over the selected clubs.
    pub fn summary(&self) -> ProgressSummary {
        let ids: Vec<&str> = self.roster.in_selection(&self.selection).map(|p| p.id.as_str()).collect();
        ProgressSummary {
            learned: self.progress.learned_count(&ids),
            total: ids.len(),
        }
    }

    pub fn catalog(&self) -> Vec<ClubEntry> {
        self.roster.catalog(&self.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz_engine::storage::MemoryStore;

    const CSV: &str = "Club Name,Player Name\nA,P1\nA,P2\nB,Q1\n";

    fn engine(seed: u64) -> QuizEngine<MemoryStore> {
        let progress = ProgressStore::load(MemoryStore::new(), "blsl_quiz");
        QuizEngine::new(Roster::from_csv(CSV), progress, &QuizConfig::default().with_seed(seed))
    }

    fn target_id(view: &RoundView) -> String {
        match view {
            RoundView::Question { target, .. } => target.id.clone(),
            RoundView::Finished { .. } => panic!("expected a question"),
        }
    }

    #[test]
    fn starts_active_with_all_clubs() {
        let e = engine(1);
        assert_eq!(e.phase(), Phase::Active);
        assert!(e.selection().is_all_selected());
        assert_eq!(e.summary(), ProgressSummary { learned: 0, total: 3 });
    }

    #[test]
    fn cooldown_blocks_until_due() {
        let mut e = engine(2);
        let target = target_id(&e.current_view());
        let outcome = e.submit_answer(&target, 1_000).unwrap();
        assert_eq!(outcome.resume_at_ms, 1_600);
        assert_eq!(e.phase(), Phase::Cooldown { until_ms: 1_600 });

        assert!(e.submit_answer(&target, 1_001).is_none());
        assert!(e.tick(1_599).is_none());
        assert!(e.tick(1_600).is_some());
        assert_eq!(e.phase(), Phase::Active);
        assert_eq!(e.mastery(&target).value(), 1);
    }

    #[test]
    fn unknown_option_is_ignored() {
        let mut e = engine(3);
        assert!(e.submit_answer("Z::Nobody", 0).is_none());
        assert_eq!(e.phase(), Phase::Active);
    }

    #[test]
    fn selection_change_during_cooldown_resets_immediately() {
        let mut e = engine(4);
        let target = target_id(&e.current_view());
        e.submit_answer(&target, 0).unwrap();
        let view = e.toggle_club("B");
        assert_eq!(e.phase(), Phase::Active);
        assert!(!view.is_finished());
        assert!(e.tick(10_000).is_none());
    }

    #[test]
    fn select_none_finishes_with_empty_club_list() {
        let mut e = engine(5);
        let view = e.select_none();
        assert_eq!(view, RoundView::Finished { clubs: vec![] });
        assert_eq!(e.phase(), Phase::Finished);
        assert!(e.submit_answer("A::P1", 0).is_none());
        assert_eq!(e.summary().total, 0);
    }

    #[test]
    fn toggle_all_restores_selection() {
        let mut e = engine(6);
        e.toggle_all();
        assert!(e.selection().is_empty());
        let view = e.toggle_all();
        assert!(e.selection().is_all_selected());
        assert!(!view.is_finished());
    }

    #[test]
    fn replace_roster_selects_new_clubs() {
        let mut e = engine(7);
        e.toggle_club("A");
        e.replace_roster(Roster::from_csv("Club Name,Player Name\nC,R1\n"));
        assert_eq!(e.selection().clubs(), &["C".to_string()]);
        assert_eq!(target_id(&e.current_view()), "C::R1");
    }
}
