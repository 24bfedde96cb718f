//! Column-aligned result storage
//!
//! Records are stored column by column, mirroring the tabular file they end up
//! in. A record is pushed as a whole or not at all, so every column always has
//! the same length.

use super::title::DetailRecord;
use std::io;

/// Output column names, in file order
pub const COLUMN_HEADERS: [&str; 6] = [
    "Title",
    "Release Year",
    "IMDB Rating",
    "Directors",
    "Cast",
    "Plot Summary",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    titles: Vec<String>,
    release_years: Vec<Option<String>>,
    ratings: Vec<Option<String>>,
    directors: Vec<Option<String>>,
    cast: Vec<String>,
    summaries: Vec<Option<String>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record across all six columns
    pub fn push(&mut self, record: DetailRecord) {
        let DetailRecord {
            title,
            release_year,
            rating,
            directors,
            cast,
            summary,
        } = record;

        self.titles.push(title);
        self.release_years.push(release_year);
        self.ratings.push(rating);
        self.directors.push(directors);
        self.cast.push(cast);
        self.summaries.push(summary);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Length of every column, in header order
    pub fn column_lengths(&self) -> [usize; 6] {
        [
            self.titles.len(),
            self.release_years.len(),
            self.ratings.len(),
            self.directors.len(),
            self.cast.len(),
            self.summaries.len(),
        ]
    }

    pub fn is_aligned(&self) -> bool {
        let lengths = self.column_lengths();
        lengths.iter().all(|len| *len == lengths[0])
    }

    /// Row `index` as cell values in header order; absent values are empty
    pub fn row(&self, index: usize) -> Option<[&str; 6]> {
        fn cell(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or_default()
        }

        Some([
            self.titles.get(index)?.as_str(),
            cell(self.release_years.get(index)?),
            cell(self.ratings.get(index)?),
            cell(self.directors.get(index)?),
            self.cast.get(index)?.as_str(),
            cell(self.summaries.get(index)?),
        ])
    }

    pub fn rows(&self) -> impl Iterator<Item = [&str; 6]> + '_ {
        (0..self.len()).filter_map(|index| self.row(index))
    }

    /// Writes the header and every row as CSV
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        debug_assert!(self.is_aligned(), "result table columns out of alignment");

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(COLUMN_HEADERS)?;
        for row in self.rows() {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
