//! Persisted datasets: CSV writers for the merge output, and the dataset source the quiz reloads.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, instrument};

use crate::domain::{QuizRow, RegionRow, TitleKind};
use crate::error::Result;

/// Write rows with a header line.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = rows.len()))]
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
  let mut wtr = csv::Writer::from_path(path)?;
  for row in rows {
    wtr.serialize(row)?;
  }
  wtr.flush()?;
  Ok(())
}

pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
  let mut rdr = csv::Reader::from_path(path)?;
  let mut out = Vec::new();
  for row in rdr.deserialize() {
    out.push(row?);
  }
  Ok(out)
}

/// Regions each title was released in, keyed by what a quiz row still knows about its title.
///
/// Quiz rows no longer carry the title id, so the key is (title, kind, start year).
/// Distinct titles that agree on all three share one region set; a region-restricted
/// tier admits both when either was released in a listed region.
#[derive(Clone, Debug, Default)]
pub struct RegionIndex {
  by_title: HashMap<(String, TitleKind, i32), HashSet<String>>,
}

impl RegionIndex {
  pub fn from_rows(rows: &[RegionRow]) -> Self {
    let mut by_title: HashMap<_, HashSet<String>> = HashMap::new();
    for r in rows {
      by_title
        .entry((r.title.clone(), r.kind, r.start_year))
        .or_default()
        .insert(r.region.clone());
    }
    Self { by_title }
  }

  pub fn is_empty(&self) -> bool {
    self.by_title.is_empty()
  }

  /// True when the row's title was released in any of `regions`.
  pub fn released_in(&self, row: &QuizRow, regions: &[String]) -> bool {
    self
      .by_title
      .get(&(row.title.clone(), row.kind, row.start_year))
      .is_some_and(|set| regions.iter().any(|r| set.contains(r)))
  }
}

/// The quiz dataset plus optional region lookups for region-restricted tiers.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
  pub rows: Vec<QuizRow>,
  pub regions: RegionIndex,
}

/// Canonical reset point of a quiz session. Loaded at start and on every replay.
pub trait DatasetSource {
  fn load(&self) -> Result<Catalog>;
}

/// Production source: the persisted quiz dataset and, optionally, the region dataset.
#[derive(Clone, Debug)]
pub struct CsvDataset {
  pub quiz_path: PathBuf,
  pub region_path: Option<PathBuf>,
}

impl DatasetSource for CsvDataset {
  #[instrument(level = "info", skip(self), fields(path = %self.quiz_path.display()))]
  fn load(&self) -> Result<Catalog> {
    let rows: Vec<QuizRow> = read_csv(&self.quiz_path)?;
    let regions = match &self.region_path {
      Some(p) => RegionIndex::from_rows(&read_csv::<RegionRow>(p)?),
      None => RegionIndex::default(),
    };
    info!(target: "quiz", rows = rows.len(), region_titles = regions.by_title.len(), "Quiz dataset loaded");
    Ok(Catalog { rows, regions })
  }
}

/// In-memory source, handy for tests and for embedding.
impl DatasetSource for Catalog {
  fn load(&self) -> Result<Catalog> {
    Ok(self.clone())
  }
}
