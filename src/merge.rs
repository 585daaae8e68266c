//! Fan-out join of people with their known-for titles, region expansion and collapse.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use tracing::{info, instrument};

use crate::domain::{MergedRow, PersonRecord, QuizRow, RegionFact, RegionRow, TitleRecord};

/// Keep the first occurrence of each distinct row, preserving order.
pub fn dedup<T: Clone + Eq + Hash>(rows: impl IntoIterator<Item = T>) -> Vec<T> {
  let mut seen = HashSet::new();
  rows.into_iter().filter(|r| seen.insert(r.clone())).collect()
}

/// One joined row per (person, resolvable known-for slot). Not deduplicated.
///
/// Slots are joined one after another and concatenated, so rows are grouped by slot.
pub fn fan_out_join(people: &[PersonRecord], titles: &[TitleRecord]) -> Vec<MergedRow> {
  let by_id: HashMap<&str, &TitleRecord> = titles.iter().map(|t| (t.id.as_str(), t)).collect();
  let mut out = Vec::new();
  for slot in 0..4 {
    for person in people {
      let Some(title_id) = person.known_for[slot].as_deref() else { continue };
      let Some(title) = by_id.get(title_id) else { continue };
      if let Some(row) = QuizRow::from_records(person, title) {
        out.push(MergedRow { title_id: title.id.clone(), row: tidy(row) });
      }
    }
  }
  out
}

/// Normalization applied to every merged row.
fn tidy(mut row: QuizRow) -> QuizRow {
  row.profession = row.profession.replace('_', " ");
  row
}

/// Person × title dataset: the fan-out join, deduplicated.
#[instrument(level = "info", skip_all, fields(people = people.len(), titles = titles.len()))]
pub fn merge_people_titles(people: &[PersonRecord], titles: &[TitleRecord]) -> Vec<MergedRow> {
  let joined = fan_out_join(people, titles);
  let joined_len = joined.len();
  let merged = dedup(joined);
  info!(target: "merge", joined = joined_len, distinct = merged.len(), "Fan-out join done");
  merged
}

/// One row per (person × title, region). Titles without any region drop out.
#[instrument(level = "info", skip_all, fields(rows = merged.len(), facts = regions.len()))]
pub fn expand_regions(merged: &[MergedRow], regions: &[RegionFact]) -> Vec<RegionRow> {
  let mut by_title: HashMap<&str, Vec<&str>> = HashMap::new();
  for fact in regions {
    by_title.entry(fact.title_id.as_str()).or_default().push(fact.region.as_str());
  }

  let expanded = merged.iter().flat_map(|m| {
    by_title
      .get(m.title_id.as_str())
      .into_iter()
      .flatten()
      .map(move |region| RegionRow::new(&m.row, region))
  });
  let out = dedup(expanded);
  info!(target: "merge", expanded = out.len(), "Region expansion done");
  out
}

/// Drop the region and deduplicate: the quiz dataset.
#[instrument(level = "info", skip_all, fields(rows = expanded.len()))]
pub fn collapse_regions(expanded: &[RegionRow]) -> Vec<QuizRow> {
  let out = dedup(expanded.iter().map(RegionRow::quiz_row));
  info!(target: "merge", collapsed = out.len(), "Region collapse done");
  out
}
