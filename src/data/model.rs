// ---------------------------------------------------------------------------
// Column – one named, uniformly typed column of the loaded table
// ---------------------------------------------------------------------------

/// Cell storage for a single column.
///
/// A column is numeric when every non-empty cell parses as a number; empty
/// cells in a numeric column are kept as `None` so the row count is
/// preserved. Anything else is stored as text verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<String>),
}

/// A single column: unique name plus cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Number of cells (equals the table's row count).
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// All cells coerced to `f64`, in row order.
    ///
    /// `None` if the column is text or any cell is empty: a plot series must
    /// cover every row.
    pub fn as_series(&self) -> Option<Vec<f64>> {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().copied().collect(),
            ColumnData::Text(_) => None,
        }
    }

    /// The present numeric values, skipping empty cells.
    ///
    /// `None` if the column is text.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v.iter().filter_map(|c| *c).collect()),
            ColumnData::Text(_) => None,
        }
    }

    /// Cell rendered for the data grid.
    pub fn cell_text(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Numeric(v) => match v.get(row) {
                Some(Some(n)) => format!("{n}"),
                _ => String::new(),
            },
            ColumnData::Text(v) => v.get(row).cloned().unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The in-memory representation of a loaded file: ordered named columns, all
/// of the same length. Immutable after load; a re-load replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Assemble a table from already-typed columns (parquet path).
    pub fn new(columns: Vec<Column>) -> Self {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        debug_assert!(columns.iter().all(|c| c.len() == row_count));
        Table { columns, row_count }
    }

    /// Build a table from a header row and string cells, inferring each
    /// column's type: numeric when every non-empty cell parses as `f64`,
    /// text otherwise.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let row_count = rows.len();
        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<&str> = rows
                    .iter()
                    .map(|r| r.get(idx).map(String::as_str).unwrap_or(""))
                    .collect();

                let numeric = cells
                    .iter()
                    .map(|c| c.trim())
                    .all(|c| c.is_empty() || c.parse::<f64>().is_ok());

                let data = if numeric {
                    ColumnData::Numeric(
                        cells
                            .iter()
                            .map(|c| {
                                let t = c.trim();
                                if t.is_empty() { None } else { t.parse().ok() }
                            })
                            .collect(),
                    )
                } else {
                    ColumnData::Text(cells.iter().map(|c| c.to_string()).collect())
                };

                Column { name, data }
            })
            .collect();

        Table { columns, row_count }
    }

    /// Look up a column by exact, case-sensitive name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn infers_numeric_and_text_columns() {
        let table = Table::from_rows(
            strings(&["id", "name", "score"]),
            vec![
                strings(&["1", "alpha", "3.5"]),
                strings(&["2", "beta", "-1"]),
            ],
        );
        assert!(table.column("id").unwrap().is_numeric());
        assert!(!table.column("name").unwrap().is_numeric());
        assert!(table.column("score").unwrap().is_numeric());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn one_non_numeric_cell_makes_the_column_text() {
        let table = Table::from_rows(
            strings(&["v"]),
            vec![strings(&["1"]), strings(&["x"]), strings(&["3"])],
        );
        let col = table.column("v").unwrap();
        assert!(!col.is_numeric());
        assert_eq!(col.as_series(), None);
        assert_eq!(col.numeric_values(), None);
    }

    #[test]
    fn empty_cells_stay_numeric_but_break_the_full_series() {
        let table = Table::from_rows(
            strings(&["v"]),
            vec![strings(&["1"]), strings(&[""]), strings(&["3"])],
        );
        let col = table.column("v").unwrap();
        assert!(col.is_numeric());
        assert_eq!(col.as_series(), None);
        assert_eq!(col.numeric_values(), Some(vec![1.0, 3.0]));
        assert_eq!(col.cell_text(1), "");
        assert_eq!(col.cell_text(2), "3");
    }

    #[test]
    fn column_lookup_is_case_sensitive() {
        let table = Table::from_rows(strings(&["Temp"]), vec![strings(&["1"])]);
        assert!(table.column("Temp").is_some());
        assert!(table.column("temp").is_none());
    }

    #[test]
    fn short_rows_are_padded_with_empty_cells() {
        let table = Table::from_rows(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3"])],
        );
        let b = table.column("b").unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b.cell_text(1), "");
    }
}
