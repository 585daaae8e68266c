//! Quiz session state machine.
//!
//! `ChoosingDifficulty → RoundLoop → Summary → Replay | Exit`
//!
//! The session owns the loaded catalog and the score. The working dataset is a
//! filtered view recomputed from the catalog on every difficulty choice, and the
//! catalog itself is reloaded from the dataset source on replay.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::QuizConfig;
use crate::console::Console;
use crate::difficulty::{Difficulty, Score};
use crate::distractors::gen_options;
use crate::error::{QuizError, Result};
use crate::questions::{build_question, sample_row, Answer, AnswerKind, Question};
use crate::store::{Catalog, DatasetSource};

const LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];
const PASS_RATIO: f64 = 0.6;
const RULE: &str = "*----------------------------------------------------------------------------------------------------*";

/// Result of one completed round loop.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSummary {
  pub difficulty: Difficulty,
  pub rounds: u32,
  pub score: f64,
  pub elapsed: Duration,
}

impl GameSummary {
  pub fn ratio(&self) -> f64 {
    self.score / f64::from(self.rounds)
  }

  pub fn passed(&self) -> bool {
    self.ratio() > PASS_RATIO
  }
}

enum State {
  ChoosingDifficulty,
  RoundLoop { difficulty: Difficulty, rounds: u32 },
  Summary(GameSummary),
  Replay,
  Exit,
}

pub struct QuizSession<S, C, R> {
  id: Uuid,
  source: S,
  console: C,
  rng: R,
  config: QuizConfig,
  current_year: i32,
}

impl<S: DatasetSource, C: Console, R: Rng> QuizSession<S, C, R> {
  pub fn new(source: S, console: C, rng: R, config: QuizConfig, current_year: i32) -> Self {
    Self { id: Uuid::new_v4(), source, console, rng, config, current_year }
  }

  /// Play until the player declines a replay or input runs out.
  /// Returns the summary of every completed game.
  #[instrument(level = "info", skip(self), fields(session = %self.id))]
  pub fn run(&mut self) -> Result<Vec<GameSummary>> {
    let mut catalog = self.source.load()?;
    let mut finished = Vec::new();
    let mut state = State::ChoosingDifficulty;
    self.console.say("Welcome to the quiz game about movies and tv series!")?;

    loop {
      let step = match state {
        State::ChoosingDifficulty => self.choose_game(),
        State::RoundLoop { difficulty, rounds } => self
          .play_rounds(&catalog, difficulty, rounds)
          .map(State::Summary),
        State::Summary(summary) => {
          let reported = self.report(&summary);
          finished.push(summary);
          reported.map(|_| State::Replay)
        }
        State::Replay => match self.ask_replay() {
          // Replay starts over from the canonical dataset.
          Ok(true) => match self.source.load() {
            Ok(fresh) => {
              catalog = fresh;
              Ok(State::ChoosingDifficulty)
            }
            Err(e) => Err(e),
          },
          Ok(false) => Ok(State::Exit),
          Err(e) => Err(e),
        },
        State::Exit => break,
      };

      state = match step {
        Ok(next) => next,
        Err(e) if e.is_round_fatal() => {
          warn!(target: "quiz", session = %self.id, error = %e, "Game aborted; back to difficulty selection");
          self.console.say(&format!("This game cannot continue: {e}. Please choose another difficulty."))?;
          catalog = self.source.load()?;
          State::ChoosingDifficulty
        }
        Err(QuizError::InputClosed) => {
          info!(target: "quiz", session = %self.id, "Input closed; leaving the game");
          State::Exit
        }
        Err(e) => return Err(e),
      };
    }

    info!(target: "quiz", session = %self.id, games = finished.len(), "Session finished");
    Ok(finished)
  }

  fn read(&mut self, message: &str) -> Result<String> {
    self.console.prompt(message)?.ok_or(QuizError::InputClosed)
  }

  fn choose_game(&mut self) -> Result<State> {
    let difficulty = loop {
      let raw = self.read("Please choose the difficulty between easy, medium and hard: ")?;
      match raw.parse::<Difficulty>() {
        Ok(d) => break d,
        Err(()) => self.console.say("Please insert a proper difficulty")?,
      }
    };
    self.console.say(difficulty.rules())?;

    let rounds = loop {
      let raw = self.read("How many rounds do you want to play? ")?;
      match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => break n,
        _ => self.console.say("Please enter a positive number of rounds")?,
      }
    };
    self.console.say(&format!("You are going to play for {rounds} rounds at {difficulty} level"))?;
    info!(target: "quiz", session = %self.id, %difficulty, rounds, "Game configured");
    Ok(State::RoundLoop { difficulty, rounds })
  }

  fn play_rounds(&mut self, catalog: &Catalog, difficulty: Difficulty, rounds: u32) -> Result<GameSummary> {
    let filter = difficulty.filter(&self.config.tiers);
    if !filter.regions.is_empty() && catalog.regions.is_empty() {
      warn!(target: "quiz", %difficulty, "Tier filters on regions but no region dataset was loaded");
    }
    let working = filter.working_set(catalog);
    info!(target: "quiz", session = %self.id, %difficulty, working = working.len(), total = catalog.rows.len(), "Working dataset ready");

    // Template order is fixed for the whole game.
    let mut order = AnswerKind::ALL;
    order.shuffle(&mut self.rng);

    let mut score = Score::default();
    let started = Instant::now();
    for round in 0..rounds {
      self.console.say(RULE)?;
      self.console.say(&format!("Round {}", round + 1))?;

      let kind = order[round as usize % order.len()];
      let row = sample_row(&working, &mut self.rng)?;
      let question = build_question(kind, row, &self.config.questions);
      let options = gen_options(&question.answer, &working, self.current_year, &mut self.rng)?;

      let chosen = self.ask_option(&question, &options)?;
      let correct = chosen == question.answer;
      let delta = score.record(correct, difficulty);
      debug!(target: "quiz", question = %question.id, ?kind, correct, delta, score = score.value(), "Round scored");

      if correct {
        self.console.say(&format!("You are correct, '{}' is the right answer", question.answer))?;
      } else {
        self.console.say(&format!(
          "Your answer was '{}' but the correct one is '{}'",
          chosen, question.answer
        ))?;
      }
      self.console.say(&format!("Your current score is: {score}"))?;
    }

    Ok(GameSummary { difficulty, rounds, score: score.value(), elapsed: started.elapsed() })
  }

  fn ask_option(&mut self, question: &Question, options: &[Answer]) -> Result<Answer> {
    self.console.say(&question.text)?;
    for (letter, option) in LETTERS.iter().zip(options) {
      self.console.say(&format!("{letter}. {option}"))?;
    }
    loop {
      let raw = self.read("Enter your answer (A, B, C, or D): ")?;
      let picked = raw.trim().to_uppercase();
      let mut chars = picked.chars();
      if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(i) = LETTERS.iter().position(|l| *l == c) {
          if let Some(option) = options.get(i) {
            return Ok(option.clone());
          }
        }
      }
      self.console.say("Invalid input. Please enter A, B, C, or D.")?;
    }
  }

  fn report(&mut self, summary: &GameSummary) -> Result<()> {
    self.console.say(RULE)?;
    self.console.say(&format!(
      "It took you {:.2} seconds to solve the quiz",
      summary.elapsed.as_secs_f64()
    ))?;
    let line = if summary.passed() {
      format!("Good job! Your final score is {}/{}", summary.score, summary.rounds)
    } else {
      format!("You can do better! your final score is {}/{}", summary.score, summary.rounds)
    };
    self.console.say(&line)?;
    info!(
      target: "quiz",
      session = %self.id,
      difficulty = %summary.difficulty,
      score = summary.score,
      rounds = summary.rounds,
      passed = summary.passed(),
      "Game finished"
    );
    Ok(())
  }

  fn ask_replay(&mut self) -> Result<bool> {
    let raw = self.read("Thank you for playing, would you like to play again ? Enter 'yes' or 'no': ")?;
    match raw.trim().to_lowercase().as_str() {
      "yes" | "y" => {
        self.console.say(RULE)?;
        Ok(true)
      }
      _ => {
        self.console.say("You are exiting the game, thank you for playing!")?;
        Ok(false)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use rand::{rngs::StdRng, SeedableRng};

  use super::*;
  use crate::console::LineConsole;
  use crate::domain::{QuizRow, TitleKind};

  fn row(i: usize, genre: &str) -> QuizRow {
    QuizRow {
      name: format!("Person {i}"),
      birth: Some(1920 + i as i32),
      profession: "actor".into(),
      second_profession: None,
      third_profession: None,
      kind: TitleKind::Movie,
      title: format!("Title {i}"),
      adult: false,
      start_year: 1950 + i as i32,
      runtime_minutes: 90,
      genre: genre.into(),
      genre_2: None,
      genre_3: None,
    }
  }

  /// Only old titles: hard has rows, medium and easy are empty.
  struct CountingSource {
    catalog: Catalog,
    loads: Cell<usize>,
  }

  impl CountingSource {
    fn new() -> Self {
      let genres = ["Drama", "Comedy", "Horror", "Western", "Crime"];
      let rows = genres.iter().enumerate().map(|(i, g)| row(i, g)).collect();
      Self { catalog: Catalog { rows, regions: Default::default() }, loads: Cell::new(0) }
    }
  }

  impl DatasetSource for &CountingSource {
    fn load(&self) -> Result<Catalog> {
      self.loads.set(self.loads.get() + 1);
      Ok(self.catalog.clone())
    }
  }

  fn play(source: &CountingSource, script: impl AsRef<[u8]>, seed: u64) -> (Vec<GameSummary>, String) {
    let mut console = LineConsole::new(script.as_ref(), Vec::new());
    let rng = StdRng::seed_from_u64(seed);
    let summaries = QuizSession::new(source, &mut console, rng, QuizConfig::default(), 2025)
      .run()
      .expect("session");
    let transcript = String::from_utf8_lossy(console.output()).into_owned();
    (summaries, transcript)
  }

  /// Replays the feedback lines of one game through the scoring rules.
  fn score_from_transcript(transcript: &str, difficulty: Difficulty) -> f64 {
    let mut score = Score::default();
    for line in transcript.lines() {
      if line.starts_with("You are correct") {
        score.record(true, difficulty);
      } else if line.starts_with("Your answer was") {
        score.record(false, difficulty);
      }
    }
    score.value()
  }

  #[test]
  fn bad_input_is_reprompted_and_scored_consistently() {
    let source = CountingSource::new();
    for seed in 0..20 {
      let script = "impossible\n HARD \n0\nmany\n3\nz\nA\nb\nAB\nc\nno\n";
      let (summaries, out) = play(&source, script, seed);
      assert_eq!(summaries.len(), 1);
      let game = &summaries[0];
      assert_eq!((game.difficulty, game.rounds), (Difficulty::Hard, 3));
      assert!(out.contains("Please insert a proper difficulty"));
      assert_eq!(out.matches("Please enter a positive number of rounds").count(), 2);
      assert_eq!(out.matches("Invalid input. Please enter A, B, C, or D.").count(), 2);
      assert!(game.score >= 0.0 && game.score <= 3.0);
      assert_eq!(game.score, score_from_transcript(&out, Difficulty::Hard));
      assert!(out.contains("You are exiting the game"));
    }
  }

  #[test]
  fn every_template_is_used_once_in_four_rounds() {
    let source = CountingSource::new();
    let (_, out) = play(&source, "hard\n4\nA\nB\nC\nD\nno\n", 11);
    for prefix in ["In which year", "What genre", "What was the title", "Who was the actor"] {
      assert_eq!(out.lines().filter(|l| l.starts_with(prefix)).count(), 1, "{prefix}");
    }
    let option_lines = out.lines().filter(|l| l.starts_with("A. ")).count();
    assert_eq!(option_lines, 4);
  }

  #[test]
  fn empty_tier_sends_player_back_to_difficulty() {
    let source = CountingSource::new();
    let (summaries, out) = play(&source, "medium\n2\nhard\n1\nA\nno\n", 5);
    assert!(out.contains("no rows left to sample a question from"));
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].difficulty, Difficulty::Hard);
    assert_eq!(source.loads.get(), 2);
  }

  #[test]
  fn replay_reloads_dataset_and_resets_score() {
    let source = CountingSource::new();
    let (summaries, out) = play(&source, "hard\n1\nA\nYes\nhard\n2\nB\nC\nmaybe\n", 3);
    assert_eq!(summaries.len(), 2);
    assert_eq!(source.loads.get(), 2);
    assert!(summaries[0].score <= 1.0);
    assert_eq!(summaries[1].rounds, 2);

    // Score of the second game only counts its own rounds.
    let second = out.split("Thank you for playing").nth(1).unwrap();
    assert_eq!(summaries[1].score, score_from_transcript(second, Difficulty::Hard));
    assert!(out.trim_end().ends_with("You are exiting the game, thank you for playing!"));
  }

  #[test]
  fn undecodable_answer_is_reprompted() {
    let source = CountingSource::new();
    let mut script = b"hard\n1\n".to_vec();
    script.extend_from_slice(&[0xff, 0xfe, b'\n']);
    script.extend_from_slice(b"A\nno\n");
    let (summaries, out) = play(&source, script, 7);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].rounds, 1);
    assert_eq!(out.matches("Invalid input. Please enter A, B, C, or D.").count(), 1);
  }

  #[test]
  fn undecodable_difficulty_is_reprompted() {
    let source = CountingSource::new();
    let mut script = vec![0xc3, 0x28, b'\n'];
    script.extend_from_slice(b"hard\n1\nA\nno\n");
    let (summaries, out) = play(&source, script, 2);
    assert_eq!(summaries.len(), 1);
    assert!(out.contains("Please insert a proper difficulty"));
  }

  #[test]
  fn closed_input_ends_the_session_cleanly() {
    let source = CountingSource::new();
    let (summaries, _) = play(&source, "hard\n", 1);
    assert!(summaries.is_empty());
  }

  #[test]
  fn pass_requires_more_than_sixty_percent() {
    let game = |score: f64| GameSummary {
      difficulty: Difficulty::Medium,
      rounds: 5,
      score,
      elapsed: Duration::from_secs(1),
    };
    assert!(!game(3.0).passed());
    assert!(game(3.5).passed());
  }
}
