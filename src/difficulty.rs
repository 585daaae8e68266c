//! Difficulty tiers: which rows a tier plays with and what a wrong answer costs.

use std::fmt;
use std::str::FromStr;

use crate::config::{TierFilter, Tiers};
use crate::domain::QuizRow;
use crate::store::{Catalog, RegionIndex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  /// Points lost on a wrong answer.
  pub fn penalty(self) -> f64 {
    match self {
      Difficulty::Hard => 1.0,
      Difficulty::Medium => 0.5,
      Difficulty::Easy => 0.0,
    }
  }

  pub fn rules(self) -> &'static str {
    match self {
      Difficulty::Hard => "Rules: +1 if you are correct, -1 otherwise",
      Difficulty::Medium => "Rules: +1 if you are correct, -0.5 otherwise",
      Difficulty::Easy => "Rules: +1 if you are correct, 0 otherwise",
    }
  }

  pub fn filter(self, tiers: &Tiers) -> &TierFilter {
    match self {
      Difficulty::Easy => &tiers.easy,
      Difficulty::Medium => &tiers.medium,
      Difficulty::Hard => &tiers.hard,
    }
  }
}

impl FromStr for Difficulty {
  type Err = ();

  /// Accepts `easy`, `medium` or `hard`, ignoring case and surrounding whitespace.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "easy" => Ok(Difficulty::Easy),
      "medium" => Ok(Difficulty::Medium),
      "hard" => Ok(Difficulty::Hard),
      _ => Err(()),
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    })
  }
}

impl TierFilter {
  pub fn accepts(&self, row: &QuizRow, regions: &RegionIndex) -> bool {
    self.min_year.map_or(true, |y| row.start_year >= y)
      && self.max_year.map_or(true, |y| row.start_year <= y)
      && (self.professions.is_empty() || self.professions.contains(&row.profession))
      && !self.excluded_genres.contains(&row.genre)
      && (self.regions.is_empty() || regions.released_in(row, &self.regions))
  }

  /// The working dataset: a filtered view over the loaded catalog.
  pub fn working_set<'a>(&self, catalog: &'a Catalog) -> Vec<&'a QuizRow> {
    catalog.rows.iter().filter(|r| self.accepts(r, &catalog.regions)).collect()
  }
}

/// Score with a floor of zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Score(f64);

impl Score {
  pub fn value(self) -> f64 {
    self.0
  }

  /// Apply one answer under `difficulty`'s penalty and return the change actually applied.
  pub fn record(&mut self, correct: bool, difficulty: Difficulty) -> f64 {
    let before = self.0;
    if correct {
      self.0 += 1.0;
    } else {
      self.0 = (self.0 - difficulty.penalty()).max(0.0);
    }
    self.0 - before
  }
}

impl fmt::Display for Score {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::TitleKind;

  fn row(year: i32, profession: &str, genre: &str) -> QuizRow {
    QuizRow {
      name: "Ann".into(),
      birth: Some(1950),
      profession: profession.into(),
      second_profession: None,
      third_profession: None,
      kind: TitleKind::Movie,
      title: format!("T{year}"),
      adult: false,
      start_year: year,
      runtime_minutes: 100,
      genre: genre.into(),
      genre_2: None,
      genre_3: None,
    }
  }

  #[test]
  fn tokens_parse_loosely() {
    assert_eq!(" HaRd \n".parse::<Difficulty>(), Ok(Difficulty::Hard));
    assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
    assert!("impossible".parse::<Difficulty>().is_err());
    assert!("".parse::<Difficulty>().is_err());
  }

  #[test]
  fn hard_wrong_answer_from_zero_stays_zero() {
    let mut s = Score::default();
    assert_eq!(s.record(false, Difficulty::Hard), 0.0);
    assert_eq!(s.value(), 0.0);
  }

  #[test]
  fn score_never_goes_negative() {
    let outcomes = [true, false, false, true, true, false, false, false, true, false];
    for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
      let mut s = Score::default();
      for ok in outcomes {
        s.record(ok, d);
        assert!(s.value() >= 0.0, "{d}: {s}");
      }
    }
    let mut medium = Score::default();
    medium.record(true, Difficulty::Medium);
    medium.record(false, Difficulty::Medium);
    assert_eq!(medium.value(), 0.5);
  }

  #[test]
  fn default_tiers_split_by_year_profession_and_genre() {
    let tiers = Tiers::default();
    let catalog = Catalog {
      rows: vec![
        row(1960, "composer", "Drama"),
        row(1990, "actor", "Drama"),
        row(1990, "composer", "Drama"),
        row(2010, "actress", "Comedy"),
        row(2010, "actress", "Documentary"),
      ],
      regions: RegionIndex::default(),
    };
    let years = |d: Difficulty| -> Vec<(i32, String)> {
      d.filter(&tiers)
        .working_set(&catalog)
        .iter()
        .map(|r| (r.start_year, r.genre.clone()))
        .collect()
    };
    assert_eq!(years(Difficulty::Hard), vec![(1960, "Drama".to_string())]);
    assert_eq!(years(Difficulty::Medium), vec![(1990, "Drama".to_string())]);
    assert_eq!(years(Difficulty::Easy), vec![(2010, "Comedy".to_string())]);
  }

  #[test]
  fn region_predicate_needs_a_matching_release() {
    let filter = TierFilter { regions: vec!["IT".into()], ..Default::default() };
    let r = row(2000, "actor", "Drama");
    let index = RegionIndex::from_rows(&[crate::domain::RegionRow::new(&r, "IT")]);
    assert!(filter.accepts(&r, &index));
    assert!(!filter.accepts(&r, &RegionIndex::default()));
  }
}
