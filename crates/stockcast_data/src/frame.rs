//! In-memory tabular price data.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{DataError, Result};

/// Date formats accepted for the optional date column.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

/// An in-memory table of named columns, with rows in ascending time order.
///
/// Cells are kept as raw strings; numeric and date interpretation happens
/// on demand per column, so a frame can carry mixed columns and the caller
/// only pays parsing cost for the columns it designates.
///
/// # Example
///
/// ```rust
/// use stockcast_data::PriceFrame;
///
/// let frame = PriceFrame::from_columns(vec![
///     ("Date".into(), vec!["2024-01-01".into(), "2024-01-02".into()]),
///     ("Close".into(), vec!["101.5".into(), "102.0".into()]),
/// ]).unwrap();
///
/// assert_eq!(frame.n_rows(), 2);
/// let close = frame.numeric_column("Close").unwrap();
/// assert_eq!(close, vec![101.5, 102.0]);
/// ```
#[derive(Debug, Clone)]
pub struct PriceFrame {
    names: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl PriceFrame {
    /// Build a frame from named columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns have differing lengths.
    pub fn from_columns(columns: Vec<(String, Vec<String>)>) -> Result<Self> {
        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        let mut n_rows: Option<usize> = None;

        for (name, values) in columns {
            match n_rows {
                None => n_rows = Some(values.len()),
                Some(n) if n != values.len() => {
                    return Err(DataError::InvalidShape(format!(
                        "column '{}' has {} rows, expected {}",
                        name,
                        values.len(),
                        n
                    )));
                }
                Some(_) => {}
            }
            names.push(name);
            data.push(values);
        }

        Ok(Self {
            names,
            columns: data,
        })
    }

    /// Read a frame from a CSV file with a header row.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// Read a frame from any CSV source with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let names: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut columns: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        for record in csv_reader.records() {
            let record = record?;
            for (i, cell) in record.iter().enumerate() {
                if let Some(col) = columns.get_mut(i) {
                    col.push(cell.to_string());
                }
            }
        }

        tracing::debug!(
            columns = names.len(),
            rows = columns.first().map_or(0, Vec::len),
            "loaded CSV frame"
        );

        Ok(Self { names, columns })
    }

    /// Get the column names in file order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Get the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Check whether the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Check whether a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Get the raw cells of a column.
    pub fn column(&self, name: &str) -> Result<&[String]> {
        let idx = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
        Ok(&self.columns[idx])
    }

    /// Parse a column as `f32` values.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingColumn`] if the column does not exist, or
    /// [`DataError::NonNumeric`] at the first cell that fails to parse.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f32>> {
        let cells = self.column(name)?;
        cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.parse::<f32>().map_err(|_| DataError::NonNumeric {
                    column: name.to_string(),
                    cell: cell.clone(),
                    row,
                })
            })
            .collect()
    }

    /// Parse a column as calendar dates.
    ///
    /// Accepts a handful of common formats; the first format that parses the
    /// first cell is locked in for the whole column, so a column mixing
    /// formats is an error rather than a silently inconsistent parse.
    pub fn date_column(&self, name: &str) -> Result<Vec<NaiveDate>> {
        let cells = self.column(name)?;
        let Some(first) = cells.first() else {
            return Ok(Vec::new());
        };
        let format = DATE_FORMATS
            .iter()
            .find(|fmt| NaiveDate::parse_from_str(first, fmt).is_ok())
            .ok_or_else(|| DataError::InvalidDate {
                column: name.to_string(),
                cell: first.clone(),
                row: 0,
            })?;
        cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                NaiveDate::parse_from_str(cell, format).map_err(|_| DataError::InvalidDate {
                    column: name.to_string(),
                    cell: cell.clone(),
                    row,
                })
            })
            .collect()
    }

    /// Get the last parsed date of a date column, if the frame is non-empty.
    pub fn last_date(&self, name: &str) -> Result<Option<NaiveDate>> {
        Ok(self.date_column(name)?.last().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> PriceFrame {
        PriceFrame::from_columns(vec![
            (
                "Date".to_string(),
                vec!["2024-01-01".into(), "2024-01-02".into(), "2024-01-03".into()],
            ),
            (
                "Close".to_string(),
                vec!["100.0".into(), "101.5".into(), "99.25".into()],
            ),
            (
                "Note".to_string(),
                vec!["a".into(), "b".into(), "c".into()],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_columns() {
        let frame = sample_frame();
        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.column_names(), &["Date", "Close", "Note"]);
        assert!(frame.has_column("Close"));
        assert!(!frame.has_column("Open"));
    }

    #[test]
    fn test_mismatched_column_lengths() {
        let result = PriceFrame::from_columns(vec![
            ("A".to_string(), vec!["1".into()]),
            ("B".to_string(), vec!["1".into(), "2".into()]),
        ]);
        assert!(matches!(result, Err(DataError::InvalidShape(_))));
    }

    #[test]
    fn test_numeric_column() {
        let frame = sample_frame();
        let close = frame.numeric_column("Close").unwrap();
        assert_eq!(close, vec![100.0, 101.5, 99.25]);
    }

    #[test]
    fn test_numeric_column_rejects_text() {
        let frame = sample_frame();
        let err = frame.numeric_column("Note").unwrap_err();
        assert!(matches!(err, DataError::NonNumeric { row: 0, .. }));
    }

    #[test]
    fn test_missing_column() {
        let frame = sample_frame();
        assert!(matches!(
            frame.numeric_column("Open"),
            Err(DataError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_date_column() {
        let frame = sample_frame();
        let dates = frame.date_column("Date").unwrap();
        assert_eq!(dates.len(), 3);
        assert_eq!(
            dates[2],
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
        assert_eq!(frame.last_date("Date").unwrap(), Some(dates[2]));
    }

    #[test]
    fn test_date_column_locks_format_from_first_cell() {
        let frame = PriceFrame::from_columns(vec![(
            "Date".to_string(),
            vec!["2024-01-02".into(), "01/03/2024".into()],
        )])
        .unwrap();
        // The second cell would parse as %m/%d/%Y, but the column format
        // was locked to %Y-%m-%d by the first cell.
        let err = frame.date_column("Date").unwrap_err();
        assert!(matches!(err, DataError::InvalidDate { row: 1, .. }));
    }

    #[test]
    fn test_from_csv_reader() {
        let csv = "Date,Close\n2024-01-01,100.0\n2024-01-02,101.0\n";
        let frame = PriceFrame::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.numeric_column("Close").unwrap(), vec![100.0, 101.0]);
    }
}
