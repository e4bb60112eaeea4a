//! Category counting.
//!
//! Missing entries are carried as [`Category::Missing`] rather than as a
//! placeholder string, so a real value that happens to read "Missing values"
//! is still counted in its own bucket.

use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::data::find_col_index;

/// Display label of the missing category
pub const MISSING_LABEL: &str = "Missing values";

/// Default cap on the number of categories kept per variable
pub const DEFAULT_MAX_CATEGORIES: usize = 30;

static MISSING: Category = Category::Missing;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Value(String),
    Missing,
}

impl Category {
    pub fn is_missing(&self) -> bool {
        matches!(self, Category::Missing)
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Value(value) => value,
            Category::Missing => MISSING_LABEL,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Table whose missing cells have been replaced by [`Category::Missing`]
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Category>>,
}

impl CategoricalData {
    pub fn column_index(&self, name: &str) -> Result<usize> {
        find_col_index(&self.headers, name)
    }
}

/// Occurrence counts for one variable, most frequent first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueCounts {
    entries: Vec<(Category, usize)>,
    /// Number of distinct categories before truncation
    distinct: usize,
}

impl ValueCounts {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(Category, usize)] {
        &self.entries
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter().map(|(category, _)| category)
    }

    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|&(_, count)| count)
    }

    pub fn get(&self, category: &Category) -> Option<usize> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|&(_, count)| count)
    }

    /// Position of the missing category among the kept entries
    pub fn missing_position(&self) -> Option<usize> {
        self.entries.iter().position(|(c, _)| c.is_missing())
    }

    pub fn distinct(&self) -> usize {
        self.distinct
    }

    pub fn is_truncated(&self) -> bool {
        self.distinct > self.entries.len()
    }
}

/// Count the values of `column`, sorted by descending count.
///
/// Ties keep the order in which categories first appear in the column. With
/// `limit = Some(n)` only the `n` most frequent categories are kept.
pub fn value_counts(data: &CategoricalData, column: &str, limit: Option<usize>) -> Result<ValueCounts> {
    let col_idx = data.column_index(column)?;

    let mut totals: HashMap<&Category, usize> = HashMap::new();
    let mut order: Vec<&Category> = Vec::new();

    for row in &data.rows {
        let category = row.get(col_idx).unwrap_or(&MISSING);
        let count = totals.entry(category).or_insert(0);
        if *count == 0 {
            order.push(category);
        }
        *count += 1;
    }

    let mut entries: Vec<(Category, usize)> = order
        .into_iter()
        .map(|category| (category.clone(), totals[category]))
        .collect();

    // Stable sort keeps first-appearance order among equal counts
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    let distinct = entries.len();
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    debug!(
        column,
        distinct,
        kept = entries.len(),
        truncated = distinct > entries.len(),
        "computed value counts"
    );

    Ok(ValueCounts { entries, distinct })
}
