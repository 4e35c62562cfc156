//! Play the quiz in a terminal.
//!
//! Run with: `cargo run --example terminal -- [roster_dir] [state_dir]`
//!
//! Set `RUST_LOG=warn` (or `debug`) to see storage warnings and round picks.
//!
//! `roster_dir` must contain `spieler.csv` (defaults to `demos/`). Progress is
//! kept in `state_dir` (defaults to `.club_quiz/`), so a second run picks up
//! where the first stopped.
//!
//! Commands at the prompt:
//!
//! - `1`..`4`   answer with that option
//! - `t <n>`    toggle club number `n`
//! - `a`        toggle all clubs
//! - `r`        restart the selected clubs (after finishing)
//! - `c`        change teams (reload the roster)
//! - `q`        quit

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

use club_quiz::{
    AnswerChoice, AnswerOutcome, ClubEntry, DirectorySource, FetchError, FileStore, OptionMark,
    PlayerCard, Presenter, ProgressSummary, QuizConfig, QuizSession,
};

/// Prints every render call and remembers what the prompt needs.
#[derive(Default)]
struct TerminalPresenter {
    clubs: Vec<String>,
    options: Vec<String>,
}

impl Presenter for TerminalPresenter {
    fn render_club_selector(&mut self, clubs: &[ClubEntry], all_selected: bool) {
        self.clubs = clubs.iter().map(|c| c.name.clone()).collect();
        let all = if all_selected { "x" } else { " " };
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("  Clubs  [{all}] all");
        for (i, c) in clubs.iter().enumerate() {
            let mark = if c.selected { "x" } else { " " };
            println!("   {:>2}. [{mark}] {}", i + 1, c.name);
        }
    }

    fn render_question(&mut self, target: &PlayerCard, options: &[AnswerChoice]) {
        self.options = options.iter().map(|o| o.id.clone()).collect();
        let flags: Vec<&str> = target.nationalities.iter().map(|n| n.name.as_str()).collect();
        println!();
        println!("  Photo: {}", target.image_url);
        println!("  {} | {} | {} | #{}",
            target.club, flags.join(" / "), target.position, target.jersey_number);
        println!();
        for (i, o) in options.iter().enumerate() {
            println!("  [{}] {}", i + 1, o.name);
        }
    }

    fn render_progress(&mut self, summary: ProgressSummary) {
        println!("  Progress: {summary}");
    }

    fn render_completion(&mut self, clubs: &[String]) {
        self.options.clear();
        println!();
        println!("  Gratuliere! Du kennst nun alle Spieler von {}.", clubs.join(", "));
        println!("  [r] Quiz wiederholen   [c] Teams wechseln");
    }

    fn render_feedback(&mut self, outcome: &AnswerOutcome, options: &[AnswerChoice]) {
        for (i, o) in options.iter().enumerate() {
            let marker = match o.mark {
                OptionMark::Correct | OptionMark::ShowCorrect => "✓",
                OptionMark::Wrong => "✗",
                OptionMark::Plain => " ",
            };
            println!("  [{}] {marker} {}", i + 1, o.name);
        }
        if outcome.is_correct {
            println!("  Richtig! (mastery {})", outcome.mastery);
        }
    }

    fn render_error(&mut self, error: &FetchError) {
        eprintln!("  Could not load the roster: {error}");
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let roster_dir = args.next().unwrap_or_else(|| "demos".to_string());
    let state_dir = args.next().unwrap_or_else(|| ".club_quiz".to_string());

    let source = DirectorySource::new(&roster_dir);
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;

    let Ok(mut session) = QuizSession::start(
        &source,
        FileStore::new(&state_dir),
        QuizConfig::default(),
        TerminalPresenter::default(),
    ) else {
        std::process::exit(1);
    };

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let cmd: Vec<&str> = line.split_whitespace().collect();

        match cmd.as_slice() {
            ["q"] => break,
            ["a"] => session.on_select_all_toggle(),
            ["r"] => session.on_restart_requested(),
            ["c"] => {
                if session.on_change_teams_requested(&source).is_err() {
                    break;
                }
            }
            ["t", n] => {
                let club = n
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| session.presenter().clubs.get(i.wrapping_sub(1)).cloned());
                match club {
                    Some(club) => session.on_club_toggle(&club),
                    None => println!("  No such club."),
                }
            }
            [n] => {
                let id = n
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| session.presenter().options.get(i.wrapping_sub(1)).cloned());
                let Some(id) = id else {
                    println!("  Unknown command.");
                    continue;
                };
                if let Some(outcome) = session.on_answer_chosen(&id, now_ms()) {
                    let wait = outcome.resume_at_ms.saturating_sub(now_ms());
                    thread::sleep(Duration::from_millis(wait));
                    session.advance(now_ms());
                }
            }
            _ => println!("  Unknown command."),
        }
    }

    let summary = session.engine().summary();
    println!("Goodbye! {summary}");
}
