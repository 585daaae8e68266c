//! Domain models: normalized source records and the rows of each derived dataset.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::util::coerce_year;

/// Title kinds that survive normalization; every other raw kind is filtered out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TitleKind {
  #[serde(rename = "movie")]
  Movie,
  #[serde(rename = "tv series")]
  TvSeries,
}

impl TitleKind {
  /// Maps the raw `titleType` token of the title table.
  pub fn from_raw(raw: &str) -> Option<Self> {
    match raw {
      "movie" => Some(TitleKind::Movie),
      "tvSeries" | "tv series" => Some(TitleKind::TvSeries),
      _ => None,
    }
  }
}

impl fmt::Display for TitleKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TitleKind::Movie => f.write_str("movie"),
      TitleKind::TvSeries => f.write_str("tv series"),
    }
  }
}

/// A person after normalization. Known-for slots are sparse: absent slots are `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonRecord {
  pub id: String,
  pub name: String,
  pub birth: Option<i32>,
  pub professions: [Option<String>; 3],
  pub known_for: [Option<String>; 4],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleRecord {
  pub id: String,
  pub kind: TitleKind,
  pub title: String,
  pub adult: bool,
  /// `0` when the source value was present but not a number.
  pub start_year: i32,
  pub runtime_minutes: u32,
  pub genres: [Option<String>; 3],
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionFact {
  pub title_id: String,
  pub region: String,
}

/// Row of the quiz dataset (`game_set.csv`): one person × title combination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuizRow {
  #[serde(rename = "name_surname")]
  pub name: String,
  #[serde(deserialize_with = "csv::invalid_option")]
  pub birth: Option<i32>,
  #[serde(rename = "first_profession")]
  pub profession: String,
  pub second_profession: Option<String>,
  pub third_profession: Option<String>,
  #[serde(rename = "type")]
  pub kind: TitleKind,
  pub title: String,
  pub adult: bool,
  #[serde(deserialize_with = "year_or_zero")]
  pub start_year: i32,
  #[serde(rename = "minutes_runtimes")]
  pub runtime_minutes: u32,
  #[serde(rename = "genre_1")]
  pub genre: String,
  pub genre_2: Option<String>,
  pub genre_3: Option<String>,
}

impl QuizRow {
  /// Flattens one person with one of their known-for titles.
  /// Returns `None` when the person has no primary profession or the title no primary genre.
  pub fn from_records(person: &PersonRecord, title: &TitleRecord) -> Option<Self> {
    let [p1, p2, p3] = &person.professions;
    let [g1, g2, g3] = &title.genres;
    Some(Self {
      name: person.name.clone(),
      birth: person.birth,
      profession: p1.clone()?,
      second_profession: p2.clone(),
      third_profession: p3.clone(),
      kind: title.kind,
      title: title.title.clone(),
      adult: title.adult,
      start_year: title.start_year,
      runtime_minutes: title.runtime_minutes,
      genre: g1.clone()?,
      genre_2: g2.clone(),
      genre_3: g3.clone(),
    })
  }
}

/// Output of the fan-out join. The title id only survives until the region join.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MergedRow {
  pub title_id: String,
  pub row: QuizRow,
}

/// Row of the region dataset (`merge_set.csv`). Same person × title appears once per region.
///
/// Kept flat (no nested `QuizRow`) because the csv serializer cannot flatten structs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionRow {
  #[serde(rename = "name_surname")]
  pub name: String,
  #[serde(deserialize_with = "csv::invalid_option")]
  pub birth: Option<i32>,
  #[serde(rename = "first_profession")]
  pub profession: String,
  pub second_profession: Option<String>,
  pub third_profession: Option<String>,
  #[serde(rename = "type")]
  pub kind: TitleKind,
  pub title: String,
  pub adult: bool,
  #[serde(deserialize_with = "year_or_zero")]
  pub start_year: i32,
  #[serde(rename = "minutes_runtimes")]
  pub runtime_minutes: u32,
  #[serde(rename = "genre_1")]
  pub genre: String,
  pub genre_2: Option<String>,
  pub genre_3: Option<String>,
  pub region: String,
}

impl RegionRow {
  pub fn new(row: &QuizRow, region: &str) -> Self {
    let row = row.clone();
    Self {
      name: row.name,
      birth: row.birth,
      profession: row.profession,
      second_profession: row.second_profession,
      third_profession: row.third_profession,
      kind: row.kind,
      title: row.title,
      adult: row.adult,
      start_year: row.start_year,
      runtime_minutes: row.runtime_minutes,
      genre: row.genre,
      genre_2: row.genre_2,
      genre_3: row.genre_3,
      region: region.to_string(),
    }
  }

  /// Drops the region, leaving the quiz grain.
  pub fn quiz_row(&self) -> QuizRow {
    QuizRow {
      name: self.name.clone(),
      birth: self.birth,
      profession: self.profession.clone(),
      second_profession: self.second_profession.clone(),
      third_profession: self.third_profession.clone(),
      kind: self.kind,
      title: self.title.clone(),
      adult: self.adult,
      start_year: self.start_year,
      runtime_minutes: self.runtime_minutes,
      genre: self.genre.clone(),
      genre_2: self.genre_2.clone(),
      genre_3: self.genre_3.clone(),
    }
  }
}

fn year_or_zero<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  Ok(coerce_year(&raw))
}
