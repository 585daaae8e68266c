//! Wrong-but-plausible options for a question.
//!
//! Years get small perturbations that never reach the current calendar year.
//! Text columns sample other distinct values from the working dataset.

use std::collections::BTreeSet;

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use crate::domain::QuizRow;
use crate::error::{QuizError, Result};
use crate::questions::{Answer, AnswerKind};

const DISTRACTORS: usize = 3;
const NEAR_OFFSETS: [i32; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
const FAR_OFFSETS: [i32; 9] = [10, 15, 20, 25, 30, 35, 40, 45, 50];

/// Four options (the correct one plus three distractors) in random order.
pub fn gen_options<R: Rng>(
  correct: &Answer,
  working: &[&QuizRow],
  current_year: i32,
  rng: &mut R,
) -> Result<Vec<Answer>> {
  let mut options = match correct {
    Answer::Year(y) => year_distractors(*y, current_year, rng).into_iter().map(Answer::Year).collect(),
    _ => categorical_distractors(correct, working, rng)?,
  };
  options.push(correct.clone());
  options.shuffle(rng);
  Ok(options)
}

/// Two near misses around `year` and one far miss before it.
/// The three values may coincide with each other, never with `year` itself.
/// The unknown-year sentinel `0` yields negative distractors; arithmetic saturates at the `i32` bounds.
pub fn year_distractors<R: Rng>(year: i32, current_year: i32, rng: &mut R) -> Vec<i32> {
  let below = year.saturating_sub(NEAR_OFFSETS[rng.gen_range(0..NEAR_OFFSETS.len())]);
  let above = year.saturating_add(NEAR_OFFSETS[rng.gen_range(0..NEAR_OFFSETS.len())]);
  let far = year.saturating_sub(FAR_OFFSETS[rng.gen_range(0..FAR_OFFSETS.len())]);
  [below, above, far]
    .into_iter()
    .map(|mut candidate| {
      while (candidate >= current_year || candidate == year) && candidate > i32::MIN {
        candidate = candidate.saturating_sub(1);
      }
      candidate
    })
    .collect()
}

fn categorical_distractors<R: Rng>(
  correct: &Answer,
  working: &[&QuizRow],
  rng: &mut R,
) -> Result<Vec<Answer>> {
  let kind = correct.kind();
  // Ordered set keeps seeded runs reproducible.
  let pool: BTreeSet<Answer> = working
    .iter()
    .map(|r| kind.answer_for(r))
    .filter(|a| a != correct)
    .collect();
  if pool.len() < DISTRACTORS {
    return Err(QuizError::InsufficientDistractors { kind, available: pool.len() });
  }
  Ok(pool.into_iter().choose_multiple(rng, DISTRACTORS))
}

/// Calendar year used to keep year options in the past.
pub fn current_year() -> i32 {
  use chrono::Datelike;
  chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::TitleKind;
  use rand::{rngs::StdRng, SeedableRng};

  fn row(name: &str, title: &str, genre: &str, year: i32) -> QuizRow {
    QuizRow {
      name: name.into(),
      birth: None,
      profession: "actor".into(),
      second_profession: None,
      third_profession: None,
      kind: TitleKind::Movie,
      title: title.into(),
      adult: false,
      start_year: year,
      runtime_minutes: 100,
      genre: genre.into(),
      genre_2: None,
      genre_3: None,
    }
  }

  fn dataset() -> Vec<QuizRow> {
    vec![
      row("Ann", "A", "Drama", 1990),
      row("Bo", "B", "Comedy", 1991),
      row("Cy", "C", "Horror", 1992),
      row("Di", "D", "Western", 1993),
      row("Ann", "E", "Drama", 1994),
    ]
  }

  #[test]
  fn year_1990_gives_four_past_options() {
    let this_year = current_year();
    for seed in 0..200 {
      let mut rng = StdRng::seed_from_u64(seed);
      let opts = gen_options(&Answer::Year(1990), &[], this_year, &mut rng).unwrap();
      assert_eq!(opts.len(), 4);
      assert!(opts.contains(&Answer::Year(1990)));
      let wrong: Vec<_> = opts.iter().filter(|a| **a != Answer::Year(1990)).collect();
      assert_eq!(wrong.len(), 3);
      for a in &opts {
        let Answer::Year(y) = a else { panic!("non-year option {a:?}") };
        assert!(*y < this_year);
      }
    }
  }

  #[test]
  fn recent_years_are_pushed_below_the_bound() {
    for seed in 0..200 {
      let mut rng = StdRng::seed_from_u64(seed);
      let ds = year_distractors(2024, 2025, &mut rng);
      assert_eq!(ds.len(), 3);
      assert!(ds.iter().all(|&y| y < 2025 && y != 2024), "{ds:?}");
    }
  }

  #[test]
  fn extreme_years_do_not_overflow() {
    for seed in 0..50 {
      let mut rng = StdRng::seed_from_u64(seed);
      let ds = year_distractors(crate::util::coerce_year("2147483647"), 2026, &mut rng);
      assert!(ds.iter().all(|&y| y < 2026), "{ds:?}");

      let ds = year_distractors(i32::MIN + 3, 2026, &mut rng);
      assert!(ds.iter().all(|&y| y != i32::MIN + 3), "{ds:?}");

      assert_eq!(year_distractors(i32::MIN, 2026, &mut rng).len(), 3);
    }
  }

  #[test]
  fn unknown_year_gives_negative_distractors() {
    for seed in 0..50 {
      let mut rng = StdRng::seed_from_u64(seed);
      let ds = year_distractors(0, 2026, &mut rng);
      assert!(ds.iter().all(|&y| y != 0), "{ds:?}");
      assert!(ds.iter().filter(|&&y| y < 0).count() >= 2, "{ds:?}");
    }
  }

  #[test]
  fn categorical_options_are_distinct_and_exclude_the_answer() {
    let data = dataset();
    let working: Vec<&QuizRow> = data.iter().collect();
    for seed in 0..100 {
      let mut rng = StdRng::seed_from_u64(seed);
      for correct in [Answer::Title("C".into()), Answer::Person("Ann".into())] {
        let opts = gen_options(&correct, &working, 2025, &mut rng).unwrap();
        assert_eq!(opts.len(), 4);
        assert_eq!(opts.iter().filter(|a| **a == correct).count(), 1);
        let distinct: BTreeSet<_> = opts.iter().collect();
        assert_eq!(distinct.len(), 4);
        assert!(opts.iter().all(|a| a.kind() == correct.kind()));
      }
    }
  }

  #[test]
  fn too_few_alternatives_is_a_named_error() {
    let data = dataset();
    let working: Vec<&QuizRow> = data.iter().take(3).collect();
    let mut rng = StdRng::seed_from_u64(1);
    let err = gen_options(&Answer::Genre("Drama".into()), &working, 2025, &mut rng).unwrap_err();
    assert!(matches!(err, QuizError::InsufficientDistractors { kind: AnswerKind::Genre, available: 2 }));
  }

  #[test]
  fn title_that_looks_like_a_year_stays_a_title() {
    let data = vec![
      row("Ann", "1984", "Drama", 1956),
      row("Bo", "Brazil", "Comedy", 1985),
      row("Cy", "Alien", "Horror", 1979),
      row("Di", "Heat", "Crime", 1995),
    ];
    let working: Vec<&QuizRow> = data.iter().collect();
    let mut rng = StdRng::seed_from_u64(3);
    let opts = gen_options(&Answer::Title("1984".into()), &working, 2025, &mut rng).unwrap();
    assert!(opts.iter().all(|a| matches!(a, Answer::Title(_))));
  }
}
