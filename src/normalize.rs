//! Record normalizer: turns the raw person, title and region tables into typed records.
//!
//! Rows that cannot be used are dropped without error; only the counts are logged.

use tracing::{debug, info, instrument};

use crate::domain::{PersonRecord, RegionFact, TitleKind, TitleRecord};
use crate::error::Result;
use crate::table::{RawTable, RowView};
use crate::util::{coerce_year, trunc_for_log};

const PROFESSION_COLS: [&str; 3] = ["first_profession", "second_profession", "third_profession"];
const KNOWN_FOR_COLS: [&str; 4] = ["movie_1", "movie_2", "movie_3", "movie_4"];
const GENRE_COLS: [&str; 3] = ["genre_1", "genre_2", "genre_3"];

/// Raw `titleType` values that are kept.
const KEPT_TITLE_TYPES: [&str; 2] = ["movie", "tvSeries"];

#[instrument(level = "info", skip_all, fields(raw_rows = raw.rows.len()))]
pub fn normalize_people(mut raw: RawTable) -> Result<Vec<PersonRecord>> {
  // Death year is absent for most people.
  raw.drop_columns(&["deathYear"]);
  let incomplete = raw.drop_incomplete();
  raw.split_column("primaryProfession", PROFESSION_COLS)?;
  raw.split_column("knownForTitles", KNOWN_FOR_COLS)?;
  raw.rename_columns(&[
    ("nconst", "name_id"),
    ("primaryName", "name_surname"),
    ("birthYear", "birth"),
  ]);

  let people: Vec<PersonRecord> = raw.iter().filter_map(|r| person_from_row(&r)).collect();
  info!(
    target: "merge",
    kept = people.len(),
    dropped_incomplete = incomplete,
    dropped_untyped = raw.rows.len() - people.len(),
    "Normalized people"
  );
  Ok(people)
}

fn person_from_row(r: &RowView<'_>) -> Option<PersonRecord> {
  Some(PersonRecord {
    id: r.get("name_id")?.to_string(),
    name: r.get("name_surname")?.to_string(),
    birth: r.get("birth").and_then(|b| b.trim().parse().ok()),
    professions: PROFESSION_COLS.map(|c| r.get(c).map(str::to_string)),
    known_for: KNOWN_FOR_COLS.map(|c| r.get(c).map(str::to_string)),
  })
}

#[instrument(level = "info", skip_all, fields(raw_rows = raw.rows.len()))]
pub fn normalize_titles(mut raw: RawTable) -> Result<Vec<TitleRecord>> {
  // `endYear` is almost always missing; `primaryTitle` supersedes `originalTitle`.
  raw.drop_columns(&["endYear", "originalTitle"]);
  let other_kinds = raw.filter_values("titleType", &KEPT_TITLE_TYPES)?;
  let incomplete = raw.drop_incomplete();
  raw.split_column("genres", GENRE_COLS)?;
  raw.rename_columns(&[
    ("tconst", "movie_id"),
    ("titleType", "type"),
    ("primaryTitle", "title"),
    ("isAdult", "adult"),
    ("startYear", "start_year"),
    ("runtimeMinutes", "minutes_runtimes"),
  ]);

  let titles: Vec<TitleRecord> = raw.iter().filter_map(|r| title_from_row(&r)).collect();
  info!(
    target: "merge",
    kept = titles.len(),
    dropped_other_kinds = other_kinds,
    dropped_incomplete = incomplete,
    dropped_untyped = raw.rows.len() - titles.len(),
    "Normalized titles"
  );
  Ok(titles)
}

fn title_from_row(r: &RowView<'_>) -> Option<TitleRecord> {
  let runtime_minutes = match r.get("minutes_runtimes")?.trim().parse::<u32>() {
    Ok(m) => m,
    Err(_) => {
      debug!(
        target: "merge",
        id = r.get("movie_id"),
        title = %trunc_for_log(r.get("title").unwrap_or_default(), 40),
        "Unparseable runtime; dropping title"
      );
      return None;
    }
  };
  Some(TitleRecord {
    id: r.get("movie_id")?.to_string(),
    kind: TitleKind::from_raw(r.get("type")?)?,
    title: r.get("title")?.to_string(),
    adult: r.get("adult")? == "1",
    start_year: coerce_year(r.get("start_year")?),
    runtime_minutes,
    genres: GENRE_COLS.map(|c| r.get(c).map(str::to_string)),
  })
}

#[instrument(level = "info", skip_all, fields(raw_rows = raw.rows.len()))]
pub fn normalize_regions(mut raw: RawTable) -> Result<Vec<RegionFact>> {
  raw.retain_columns(&["titleId", "region"])?;
  let incomplete = raw.drop_incomplete();
  let facts: Vec<RegionFact> = raw
    .iter()
    .filter_map(|r| {
      Some(RegionFact {
        title_id: r.get("titleId")?.to_string(),
        region: r.get("region")?.to_string(),
      })
    })
    .collect();
  info!(target: "merge", kept = facts.len(), dropped_incomplete = incomplete, "Normalized regions");
  Ok(facts)
}
