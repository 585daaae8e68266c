//! imdb-quiz · Movie & TV trivia
//!
//! - `merge`: joins the IMDb people/title/region dumps into two CSV datasets
//! - `play` : terminal multiple-choice quiz over the merged dataset
//!
//! Important env variables:
//!   QUIZ_CONFIG_PATH : path to TOML config (tiers, question templates, output names)
//!   QUIZ_DATASET     : quiz dataset for `play` (default "game_set.csv")
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod config;
mod console;
mod difficulty;
mod distractors;
mod domain;
mod error;
mod merge;
mod normalize;
mod pipeline;
mod questions;
mod session;
mod store;
mod table;
mod telemetry;
mod util;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use crate::config::load_quiz_config;
use crate::console::LineConsole;
use crate::pipeline::{run_merge, SourceTables};
use crate::session::QuizSession;
use crate::store::CsvDataset;

#[derive(Parser)]
#[command(name = "imdb-quiz", about = "Merge IMDb dumps and play a movie trivia quiz")]
struct Cli {
  /// TOML config file (difficulty tiers, question templates, output names)
  #[arg(long, global = true, env = "QUIZ_CONFIG_PATH")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Build the region dataset and the quiz dataset from the raw TSV tables
  Merge {
    /// name.basics.tsv
    #[arg(long)]
    people: PathBuf,
    /// title.basics.tsv
    #[arg(long)]
    titles: PathBuf,
    /// title.akas.tsv
    #[arg(long)]
    akas: PathBuf,
    /// Directory the CSV datasets are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
  },
  /// Play the quiz in this terminal
  Play {
    /// Quiz dataset written by `merge`
    #[arg(long, env = "QUIZ_DATASET", default_value = "game_set.csv")]
    dataset: PathBuf,
    /// Region dataset, needed only by tiers that filter on regions
    #[arg(long)]
    regions: Option<PathBuf>,
    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,
  },
}

fn main() -> anyhow::Result<()> {
  telemetry::init_tracing();
  let cli = Cli::parse();
  let cfg = load_quiz_config(cli.config.as_deref());

  match cli.command {
    Command::Merge { people, titles, akas, out_dir } => {
      let sources = SourceTables { people, titles, akas };
      let report = run_merge(&sources, &out_dir, &cfg.output)
        .with_context(|| format!("merging into {}", out_dir.display()))?;
      println!(
        "Wrote {} ({} rows) and {} ({} rows)",
        report.region_dataset.display(),
        report.region_rows,
        report.quiz_dataset.display(),
        report.quiz_rows
      );
    }
    Command::Play { dataset, regions, seed } => {
      let source = CsvDataset { quiz_path: dataset, region_path: regions };
      let rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
      };
      let stdin = io::stdin();
      let console = LineConsole::new(stdin.lock(), io::stdout());
      let games = QuizSession::new(source.clone(), console, rng, cfg, distractors::current_year())
        .run()
        .with_context(|| format!("playing from {}", source.quiz_path.display()))?;
      info!(target: "imdb_quiz", games = games.len(), "Bye");
    }
  }
  Ok(())
}
