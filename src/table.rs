//! Untyped tab-delimited tables and the column operations the normalizer is built from.
//!
//! Cells are `Option<String>`: the `\N` sentinel of the source dumps is read as `None`.

use std::{fs::File, io::Read, path::Path};

use csv::ReaderBuilder;
use tracing::{debug, instrument};

use crate::error::{QuizError, Result};
use crate::util::split_fixed;

/// Token the source dumps use for "no value".
pub const NULL_TOKEN: &str = "\\N";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTable {
  pub headers: Vec<String>,
  pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
  /// Open a TSV file on disk.
  #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
  pub fn read_tsv(path: impl AsRef<Path>) -> Result<Self> {
    let file = File::open(path.as_ref())?;
    let table = Self::from_reader(file)?;
    debug!(target: "merge", rows = table.rows.len(), cols = table.headers.len(), "Loaded table");
    Ok(table)
  }

  /// Parse tab-delimited text with a header row. Quotes are literal in the dumps.
  pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
    let mut rdr = ReaderBuilder::new()
      .delimiter(b'\t')
      .quoting(false)
      .flexible(true)
      .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();
    let mut rows = Vec::new();
    for record in rdr.records() {
      let record = record?;
      let mut row: Vec<Option<String>> = record
        .iter()
        .take(width)
        .map(|cell| if cell == NULL_TOKEN { None } else { Some(cell.to_string()) })
        .collect();
      // Short lines leave the trailing cells missing.
      row.resize(width, None);
      rows.push(row);
    }
    Ok(Self { headers, rows })
  }

  pub fn column(&self, name: &str) -> Result<usize> {
    self
      .headers
      .iter()
      .position(|h| h == name)
      .ok_or_else(|| QuizError::MissingColumn(name.to_string()))
  }

  /// Remove the named columns. Names that are not present are ignored.
  pub fn drop_columns(&mut self, names: &[&str]) {
    let keep: Vec<bool> = self.headers.iter().map(|h| !names.contains(&h.as_str())).collect();
    self.project(&keep);
  }

  /// Keep only the named columns, in their original order.
  pub fn retain_columns(&mut self, names: &[&str]) -> Result<()> {
    for n in names {
      self.column(n)?;
    }
    let keep: Vec<bool> = self.headers.iter().map(|h| names.contains(&h.as_str())).collect();
    self.project(&keep);
    Ok(())
  }

  fn project(&mut self, keep: &[bool]) {
    self.headers = keep_flagged(std::mem::take(&mut self.headers), keep);
    self.rows = std::mem::take(&mut self.rows)
      .into_iter()
      .map(|r| keep_flagged(r, keep))
      .collect();
  }

  /// Keep rows whose `column` value is one of `allowed`.
  pub fn filter_values(&mut self, column: &str, allowed: &[&str]) -> Result<usize> {
    let idx = self.column(column)?;
    let before = self.rows.len();
    self
      .rows
      .retain(|r| r[idx].as_deref().is_some_and(|v| allowed.contains(&v)));
    Ok(before - self.rows.len())
  }

  /// Drop every row that has a missing value in any column. Returns how many were dropped.
  pub fn drop_incomplete(&mut self) -> usize {
    let before = self.rows.len();
    self.rows.retain(|r| r.iter().all(Option::is_some));
    before - self.rows.len()
  }

  /// Replace `source` by `N` positional columns holding its comma-separated values.
  pub fn split_column<const N: usize>(&mut self, source: &str, outputs: [&str; N]) -> Result<()> {
    let idx = self.column(source)?;
    self.headers.remove(idx);
    self.headers.extend(outputs.iter().map(|s| s.to_string()));
    for row in &mut self.rows {
      let raw = row.remove(idx);
      let parts: [Option<String>; N] = match raw {
        Some(v) => split_fixed::<N>(&v),
        None => std::array::from_fn(|_| None),
      };
      row.extend(parts);
    }
    Ok(())
  }

  pub fn rename_columns(&mut self, pairs: &[(&str, &str)]) {
    for h in &mut self.headers {
      if let Some((_, to)) = pairs.iter().find(|(from, _)| from == h) {
        *h = to.to_string();
      }
    }
  }

  /// Iterate rows with by-name access.
  pub fn iter(&self) -> impl Iterator<Item = RowView<'_>> {
    self.rows.iter().map(move |cells| RowView { table: self, cells })
  }
}

fn keep_flagged<T>(cells: Vec<T>, keep: &[bool]) -> Vec<T> {
  cells
    .into_iter()
    .zip(keep.iter())
    .filter_map(|(c, &k)| k.then_some(c))
    .collect()
}

pub struct RowView<'a> {
  table: &'a RawTable,
  cells: &'a [Option<String>],
}

impl<'a> RowView<'a> {
  pub fn get(&self, name: &str) -> Option<&'a str> {
    let idx = self.table.headers.iter().position(|h| h == name)?;
    self.cells.get(idx)?.as_deref()
  }
}
