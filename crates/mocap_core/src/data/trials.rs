//! Trial tables: one row per pitch, named numeric and text columns.
//!
//! A column is numeric when every non-empty cell parses as a number.
//! Empty numeric cells become NaN and are skipped by the statistics.

use crate::error::{CoreError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    fn select(&self, rows: &[usize]) -> Column {
        match self {
            Column::Numeric(values) => Column::Numeric(rows.iter().map(|&i| values[i]).collect()),
            Column::Text(values) => Column::Text(rows.iter().map(|&i| values[i].clone()).collect()),
        }
    }
}

/// Column-oriented table of repeated trials.
#[derive(Debug, Clone, Default)]
pub struct TrialTable {
    rows: usize,
    order: Vec<String>,
    columns: HashMap<String, Column>,
}

impl TrialTable {
    /// Create an empty table expecting `rows` rows per column.
    pub fn with_rows(rows: usize) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Load a CSV file with a header row.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let table = Self::from_reader(file)?;
        debug!(
            "Loaded {} rows × {} columns from {}",
            table.len(),
            table.order.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV from any reader (header row required).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut rows = 0usize;
        for record in reader.records() {
            let record = record?;
            for (idx, cell) in record.iter().enumerate() {
                cells[idx].push(cell.to_string());
            }
            rows += 1;
        }

        let mut table = Self::with_rows(rows);
        for (name, raw) in headers.into_iter().zip(cells) {
            match parse_numeric(&raw) {
                Some(values) => table.push_numeric(&name, values)?,
                None => table.push_text(&name, raw)?,
            }
        }
        Ok(table)
    }

    pub fn push_numeric(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        self.push(name, Column::Numeric(values))
    }

    pub fn push_text(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        self.push(name, Column::Text(values))
    }

    fn push(&mut self, name: &str, column: Column) -> Result<()> {
        if column.len() != self.rows {
            return Err(CoreError::InvalidConfig(format!(
                "column '{}' has {} rows, table has {}",
                name,
                column.len(),
                self.rows
            )));
        }
        if self.columns.insert(name.to_string(), column).is_none() {
            self.order.push(name.to_string());
        }
        Ok(())
    }

    /// Number of rows (trials).
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.order
    }

    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        match self.columns.get(name) {
            Some(Column::Numeric(values)) => Some(values),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&[String]> {
        match self.columns.get(name) {
            Some(Column::Text(values)) => Some(values),
            _ => None,
        }
    }

    pub fn require_numeric(&self, name: &str) -> Result<&[f64]> {
        self.numeric(name)
            .ok_or_else(|| CoreError::MissingColumn(name.to_string()))
    }

    pub fn require_text(&self, name: &str) -> Result<&[String]> {
        self.text(name)
            .ok_or_else(|| CoreError::MissingColumn(name.to_string()))
    }

    /// Numeric columns in file order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.order.iter().filter_map(move |name| match self.columns.get(name) {
            Some(Column::Numeric(values)) => Some((name.as_str(), values.as_slice())),
            _ => None,
        })
    }

    /// Keep only the rows for which `keep(row)` is true.
    pub fn filter_rows<F>(&self, keep: F) -> TrialTable
    where
        F: Fn(usize) -> bool,
    {
        let selected: Vec<usize> = (0..self.rows).filter(|&row| keep(row)).collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, column)| (name.clone(), column.select(&selected)))
            .collect();
        TrialTable {
            rows: selected.len(),
            order: self.order.clone(),
            columns,
        }
    }
}

fn parse_numeric(raw: &[String]) -> Option<Vec<f64>> {
    let mut values = Vec::with_capacity(raw.len());
    let mut any = false;
    for cell in raw {
        if cell.is_empty() {
            values.push(f64::NAN);
            continue;
        }
        values.push(cell.parse::<f64>().ok()?);
        any = true;
    }
    // all-empty columns carry no numbers; keep them as text
    if any || raw.is_empty() {
        Some(values)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_numeric_and_text_columns() {
        let csv = "\u{feff}session,p_throws,pitch_speed_mph\n1031_2,R,90.4\n1031_3,L,\n";
        let table = TrialTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_names()[0], "session");
        assert!(table.text("session").is_some());
        assert_eq!(table.text("p_throws").unwrap()[1], "L");
        let speed = table.numeric("pitch_speed_mph").unwrap();
        assert_eq!(speed[0], 90.4);
        assert!(speed[1].is_nan());
    }

    #[test]
    fn test_filter_rows_keeps_order() {
        let csv = "a,b\n1,x\n2,y\n3,z\n";
        let table = TrialTable::from_reader(csv.as_bytes()).unwrap();
        let filtered = table.filter_rows(|row| row != 1);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.numeric("a").unwrap(), &[1.0, 3.0]);
        assert_eq!(filtered.text("b").unwrap(), &["x".to_string(), "z".to_string()]);
        assert_eq!(filtered.column_names(), table.column_names());
    }

    #[test]
    fn test_push_rejects_length_mismatch() {
        let mut table = TrialTable::with_rows(3);
        assert!(table.push_numeric("a", vec![1.0, 2.0]).is_err());
        assert!(table.push_numeric("a", vec![1.0, 2.0, 3.0]).is_ok());
    }

    #[test]
    fn test_ragged_csv_is_an_error() {
        let csv = "a,b\n1,2\n3\n";
        assert!(matches!(
            TrialTable::from_reader(csv.as_bytes()),
            Err(CoreError::Csv(_))
        ));
    }

    #[test]
    fn test_from_csv_path() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"arm_slot,p_throws\n41,R\n44,R\n")?;
        let table = TrialTable::from_csv_path(file.path())?;
        assert_eq!(table.require_numeric("arm_slot")?, &[41.0, 44.0]);
        assert!(matches!(
            table.require_numeric("missing"),
            Err(CoreError::MissingColumn(_))
        ));
        Ok(())
    }
}
