use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::counts::{CategoricalData, Category};

/// Raw input table. `None` marks a missing entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl PlotData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    /// Create PlotData from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        if array.is_empty() {
            return Err(anyhow!("Input data array is empty"));
        }

        // Extract headers from the first object
        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Number(n)) => Some(n.to_string()),
                    Some(Value::Bool(b)) => Some(b.to_string()),
                    Some(Value::Null) | None => None,
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        find_col_index(&self.headers, name)
    }

    /// Number of missing entries in a column
    pub fn missing_count(&self, name: &str) -> Result<usize> {
        let idx = self.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .filter(|row| row.get(idx).map_or(true, Option::is_none))
            .count())
    }

    /// Copy of the table with every missing cell, in every column, replaced
    /// by the missing marker.
    pub fn fill_missing(&self) -> CategoricalData {
        let width = self.headers.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                (0..width)
                    .map(|idx| match row.get(idx) {
                        Some(Some(value)) => Category::Value(value.clone()),
                        _ => Category::Missing,
                    })
                    .collect()
            })
            .collect();

        CategoricalData {
            headers: self.headers.clone(),
            rows,
        }
    }
}

pub(crate) fn find_col_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| anyhow!("Column '{}' not found", name))
}
