//! Model-ready rows produced by payload normalization.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A resolved scalar in a normalized row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Integer value or encoded category
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Non-numeric text left as supplied
    Text(String),
}

impl Cell {
    /// Numeric view of the cell; text has none
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// One named cell per canonical feature, in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    cells: Vec<(String, Cell)>,
}

impl NormalizedRow {
    /// Create an empty row with room for `capacity` columns
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Append a column
    pub fn push(&mut self, name: impl Into<String>, cell: Cell) {
        self.cells.push((name.into(), cell));
    }

    /// Look up a column by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Column names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(n, _)| n.as_str())
    }

    /// Cells in column order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().map(|(_, c)| c)
    }

    /// Iterate over `(name, cell)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for NormalizedRow {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(n, c)| (n.into(), c)).collect(),
        }
    }
}

impl Serialize for NormalizedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, cell) in &self.cells {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_numeric_view() {
        assert_eq!(Cell::Int(3).as_f64(), Some(3.0));
        assert_eq!(Cell::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Cell::from("north").as_f64(), None);
    }

    #[test]
    fn test_row_keeps_column_order() {
        let row: NormalizedRow = [
            ("area", Cell::Int(1200)),
            ("bedrooms", Cell::Int(3)),
            ("location_enc", Cell::Int(7)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            row.names().collect::<Vec<_>>(),
            vec!["area", "bedrooms", "location_enc"]
        );
        assert_eq!(row.get("bedrooms"), Some(&Cell::Int(3)));
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"area":1200,"bedrooms":3,"location_enc":7}"#
        );
    }
}
