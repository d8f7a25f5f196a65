use std::collections::HashMap;

use crate::alias::{AliasEntry, Language};
use crate::params::Value;

/// A fetched row: positional values with their column names, in select-list
/// order. Relabeling and key conversion operate on this fixed shape instead
/// of on loosely-typed dictionaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    pub fn into_map(self) -> HashMap<String, Value> {
        self.columns.into_iter().zip(self.values).collect()
    }
}

/// Replace column names by ordinal position with the selected language's
/// alias labels. Columns without an alias entry keep their names.
pub fn relabel(row: &mut Row, aliases: &[AliasEntry], language: Language) {
    for entry in aliases {
        if let Some(column) = row.columns.get_mut(entry.position) {
            *column = entry.label(language).to_owned();
        }
    }
}

/// Convert every column name from snake_case to camelCase.
pub fn camelize_columns(row: &mut Row) {
    for column in &mut row.columns {
        *column = camelize(column);
    }
}

/// `table_name` → `tableName`. The first segment is kept as written.
pub fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut first = true;
    for segment in name.split('_').filter(|s| !s.is_empty()) {
        if first {
            out.push_str(segment);
            first = false;
        } else {
            let mut chars = segment.chars();
            if let Some(head) = chars.next() {
                out.extend(head.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}
