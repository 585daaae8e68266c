//! Loading quiz configuration (difficulty tiers, question templates, output names) from TOML.
//!
//! See `QuizConfig`, `TierFilter` and `QuestionTemplates` for expected schema.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub tiers: Tiers,
  #[serde(default)]
  pub questions: QuestionTemplates,
  #[serde(default)]
  pub output: OutputNames,
}

/// The filter each difficulty applies to the quiz dataset.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Tiers {
  pub easy: TierFilter,
  pub medium: TierFilter,
  pub hard: TierFilter,
}

/// Predicates of one tier. Empty lists and absent bounds do not filter.
#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct TierFilter {
  #[serde(default)] pub min_year: Option<i32>,
  #[serde(default)] pub max_year: Option<i32>,
  /// Primary profession must be one of these.
  #[serde(default)] pub professions: Vec<String>,
  /// Primary genre must not be one of these.
  #[serde(default)] pub excluded_genres: Vec<String>,
  /// Title must have been released in at least one of these regions.
  #[serde(default)] pub regions: Vec<String>,
}

const MAIN_CREW: [&str; 5] = ["actor", "actress", "writer", "producer", "director"];
const NICHE_GENRES: [&str; 9] = [
  "Documentary", "Talk-Show", "Game-Show", "Sci-Fi", "News", "History", "Reality-TV", "Short", "Adult",
];

fn owned(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

impl Default for Tiers {
  fn default() -> Self {
    Self {
      hard: TierFilter { max_year: Some(1974), ..Default::default() },
      medium: TierFilter {
        min_year: Some(1975),
        max_year: Some(2004),
        professions: owned(&MAIN_CREW),
        ..Default::default()
      },
      easy: TierFilter {
        min_year: Some(2005),
        professions: owned(&MAIN_CREW),
        excluded_genres: owned(&NICHE_GENRES),
        ..Default::default()
      },
    }
  }
}

/// Question wording. Placeholders: `{kind}`, `{title}`, `{name}`, `{profession}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QuestionTemplates {
  pub year: String,
  pub genre: String,
  pub title: String,
  pub person: String,
}

impl Default for QuestionTemplates {
  fn default() -> Self {
    Self {
      year: "In which year was the {kind} '{title}' of {name} as a {profession} component produced ?".into(),
      genre: "What genre is the {kind} '{title}' of {name} as a {profession} component ?".into(),
      title: "What was the title of the {kind} with {name} as a {profession} component ?".into(),
      person: "Who was the {profession} of the {kind} named '{title}' ?".into(),
    }
  }
}

/// File names written by the merge pipeline and read back by the quiz.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutputNames {
  pub region_dataset: String,
  pub quiz_dataset: String,
}

impl Default for OutputNames {
  fn default() -> Self {
    Self { region_dataset: "merge_set.csv".into(), quiz_dataset: "game_set.csv".into() }
  }
}

/// Load `QuizConfig` from `path`. On any parsing/IO error, logs it and uses defaults.
pub fn load_quiz_config(path: Option<&Path>) -> QuizConfig {
  let Some(path) = path else {
    info!(target: "imdb_quiz", "No config file given; using built-in tiers and templates");
    return QuizConfig::default();
  };
  let shown = path.display();
  match std::fs::read_to_string(path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "imdb_quiz", path = %shown, "Loaded quiz config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "imdb_quiz", path = %shown, error = %e, "Failed to parse TOML config");
        QuizConfig::default()
      }
    },
    Err(e) => {
      error!(target: "imdb_quiz", path = %shown, error = %e, "Failed to read TOML config file");
      QuizConfig::default()
    }
  }
}
