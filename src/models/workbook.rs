//! Decoded workbook model.
//!
//! A [`Workbook`] is the decoder's output: named sheets in declared order,
//! each an ordered list of rows. Nothing in the engine mutates it.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, Row};

/// A named sheet of rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    /// The sheet's tab name.
    pub name: String,
    /// Rows in sheet order; row 0 is the first row of the used range.
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Creates a sheet from its name and rows.
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Renders the first `count` rows as short strings for error messages.
    ///
    /// # Example
    ///
    /// ```
    /// use appraisal_engine::models::{Cell, Sheet};
    ///
    /// let sheet = Sheet::new("名單", vec![vec![Cell::from("報表"), Cell::Empty, Cell::Number(2024.0)]]);
    /// assert_eq!(sheet.sample_rows(3), vec!["[報表, , 2024]".to_string()]);
    /// ```
    pub fn sample_rows(&self, count: usize) -> Vec<String> {
        self.rows
            .iter()
            .take(count)
            .map(|row| {
                let cells: Vec<String> = row.iter().map(Cell::text).collect();
                format!("[{}]", cells.join(", "))
            })
            .collect()
    }
}

/// An ordered collection of sheets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workbook {
    /// Sheets in the order the file declares them.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Creates a workbook from sheets.
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Returns the sheet names in declared order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }
}
