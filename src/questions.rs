//! Question templates and the tagged answers they produce.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::config::QuestionTemplates;
use crate::domain::QuizRow;
use crate::error::{QuizError, Result};
use crate::util::fill_template;

/// Which column of the sampled row a question asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnswerKind {
  Year,
  Genre,
  Title,
  Person,
}

impl AnswerKind {
  pub const ALL: [AnswerKind; 4] = [AnswerKind::Year, AnswerKind::Genre, AnswerKind::Title, AnswerKind::Person];

  /// The column value this kind reads from a row.
  pub fn answer_for(self, row: &QuizRow) -> Answer {
    match self {
      AnswerKind::Year => Answer::Year(row.start_year),
      AnswerKind::Genre => Answer::Genre(row.genre.clone()),
      AnswerKind::Title => Answer::Title(row.title.clone()),
      AnswerKind::Person => Answer::Person(row.name.clone()),
    }
  }
}

impl fmt::Display for AnswerKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      AnswerKind::Year => "year",
      AnswerKind::Genre => "genre",
      AnswerKind::Title => "title",
      AnswerKind::Person => "person",
    })
  }
}

/// An option value tagged with the column it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Answer {
  Year(i32),
  Genre(String),
  Title(String),
  Person(String),
}

impl Answer {
  pub fn kind(&self) -> AnswerKind {
    match self {
      Answer::Year(_) => AnswerKind::Year,
      Answer::Genre(_) => AnswerKind::Genre,
      Answer::Title(_) => AnswerKind::Title,
      Answer::Person(_) => AnswerKind::Person,
    }
  }
}

impl fmt::Display for Answer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Answer::Year(y) => write!(f, "{y}"),
      Answer::Genre(s) | Answer::Title(s) | Answer::Person(s) => f.write_str(s),
    }
  }
}

#[derive(Clone, Debug)]
pub struct Question {
  pub id: Uuid,
  pub text: String,
  pub answer: Answer,
}

/// Uniform pick with replacement from the working dataset.
pub fn sample_row<'a, R: Rng>(working: &[&'a QuizRow], rng: &mut R) -> Result<&'a QuizRow> {
  working.choose(rng).copied().ok_or(QuizError::EmptyCandidatePool)
}

/// Phrase a question about `row` whose answer is the `kind` column.
pub fn build_question(kind: AnswerKind, row: &QuizRow, templates: &QuestionTemplates) -> Question {
  let tpl = match kind {
    AnswerKind::Year => &templates.year,
    AnswerKind::Genre => &templates.genre,
    AnswerKind::Title => &templates.title,
    AnswerKind::Person => &templates.person,
  };
  let kind_label = row.kind.to_string();
  let text = fill_template(
    tpl,
    &[
      ("kind", kind_label.as_str()),
      ("title", row.title.as_str()),
      ("name", row.name.as_str()),
      ("profession", row.profession.as_str()),
    ],
  );
  Question { id: Uuid::new_v4(), text, answer: kind.answer_for(row) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::TitleKind;
  use rand::{rngs::StdRng, SeedableRng};

  fn row() -> QuizRow {
    QuizRow {
      name: "Ann Lee".into(),
      birth: Some(1950),
      profession: "director".into(),
      second_profession: None,
      third_profession: None,
      kind: TitleKind::TvSeries,
      title: "Night Shift".into(),
      adult: false,
      start_year: 1999,
      runtime_minutes: 45,
      genre: "Crime".into(),
      genre_2: None,
      genre_3: None,
    }
  }

  #[test]
  fn each_template_hides_its_own_answer() {
    let r = row();
    let t = QuestionTemplates::default();

    let year = build_question(AnswerKind::Year, &r, &t);
    assert_eq!(year.answer, Answer::Year(1999));
    assert!(year.text.contains("tv series 'Night Shift'") && year.text.contains("Ann Lee"));
    assert!(!year.text.contains("1999"));

    let title = build_question(AnswerKind::Title, &r, &t);
    assert_eq!(title.answer, Answer::Title("Night Shift".into()));
    assert!(!title.text.contains("Night Shift"));

    let person = build_question(AnswerKind::Person, &r, &t);
    assert_eq!(person.text, "Who was the director of the tv series named 'Night Shift' ?");
    assert_eq!(person.answer.to_string(), "Ann Lee");

    assert_eq!(build_question(AnswerKind::Genre, &r, &t).answer.kind(), AnswerKind::Genre);
  }

  #[test]
  fn empty_pool_is_a_named_error() {
    let mut rng = StdRng::seed_from_u64(7);
    assert!(matches!(sample_row(&[], &mut rng), Err(QuizError::EmptyCandidatePool)));
    let r = row();
    assert_eq!(sample_row(&[&r], &mut rng).unwrap().title, "Night Shift");
  }
}
