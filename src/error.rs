//! Error type shared by the merge pipeline and the quiz session.
//!
//! Data-quality problems in the source tables never show up here: those rows are
//! dropped silently by the normalizer. Bad player input is re-prompted, not raised.

use thiserror::Error;

use crate::questions::AnswerKind;

#[derive(Error, Debug)]
pub enum QuizError {
  /// The difficulty filter left nothing to sample a question from.
  #[error("no rows left to sample a question from at this difficulty")]
  EmptyCandidatePool,

  /// Fewer than three distinct wrong answers exist for the question's column.
  #[error("only {available} alternative {kind} value(s) available, 3 are needed")]
  InsufficientDistractors { kind: AnswerKind, available: usize },

  /// A source table is missing a column the normalizer relies on.
  #[error("column '{0}' not found in table")]
  MissingColumn(String),

  /// The terminal collaborator reached end of input.
  #[error("input closed")]
  InputClosed,

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("File I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl QuizError {
  /// Errors that end the current game but leave the session able to continue.
  pub fn is_round_fatal(&self) -> bool {
    matches!(self, QuizError::EmptyCandidatePool | QuizError::InsufficientDistractors { .. })
  }
}

pub type Result<T> = std::result::Result<T, QuizError>;
