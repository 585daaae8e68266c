//! One-shot merge: raw TSV tables in, region dataset and quiz dataset out.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::config::OutputNames;
use crate::error::Result;
use crate::merge::{collapse_regions, expand_regions, merge_people_titles};
use crate::normalize::{normalize_people, normalize_regions, normalize_titles};
use crate::store::write_csv;
use crate::table::RawTable;

/// Locations of the three source tables.
#[derive(Clone, Debug)]
pub struct SourceTables {
  pub people: PathBuf,
  pub titles: PathBuf,
  pub akas: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeReport {
  pub merged_rows: usize,
  pub region_rows: usize,
  pub quiz_rows: usize,
  pub region_dataset: PathBuf,
  pub quiz_dataset: PathBuf,
}

#[instrument(level = "info", skip_all, fields(out_dir = %out_dir.display()))]
pub fn run_merge(sources: &SourceTables, out_dir: &Path, names: &OutputNames) -> Result<MergeReport> {
  let people = normalize_people(RawTable::read_tsv(&sources.people)?)?;
  let titles = normalize_titles(RawTable::read_tsv(&sources.titles)?)?;
  let regions = normalize_regions(RawTable::read_tsv(&sources.akas)?)?;

  let merged = merge_people_titles(&people, &titles);
  let expanded = expand_regions(&merged, &regions);
  let collapsed = collapse_regions(&expanded);

  let region_dataset = out_dir.join(&names.region_dataset);
  let quiz_dataset = out_dir.join(&names.quiz_dataset);
  write_csv(&region_dataset, &expanded)?;
  write_csv(&quiz_dataset, &collapsed)?;

  let report = MergeReport {
    merged_rows: merged.len(),
    region_rows: expanded.len(),
    quiz_rows: collapsed.len(),
    region_dataset,
    quiz_dataset,
  };
  info!(
    target: "merge",
    merged = report.merged_rows,
    region_rows = report.region_rows,
    quiz_rows = report.quiz_rows,
    "Datasets written"
  );
  Ok(report)
}
