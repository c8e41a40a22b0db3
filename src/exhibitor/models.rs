//! Data models for search requests, raw hits and flattened exhibitor rows.

use crate::config::Config;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Query parameters for one page of the exhibitor search.
///
/// Everything except `page_number` comes from [`Config`] and stays fixed for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub language: String,
    pub query: String,
    pub order_by: String,
    pub page_number: u32,
    pub page_size: u32,
    pub event_id: String,
    pub or_search_fallback: bool,
    pub show_jump_labels: bool,
}

impl PageRequest {
    /// Builds the request for `page_number` from the run configuration.
    pub fn from_config(config: &Config, page_number: u32) -> Self {
        Self {
            language: config.language.clone(),
            query: config.query.clone(),
            order_by: config.order_by.clone(),
            page_number,
            page_size: config.page_size,
            event_id: config.event_id.clone(),
            or_search_fallback: config.or_search_fallback,
            show_jump_labels: config.show_jump_labels,
        }
    }

    /// Same request, different page.
    pub fn with_page(&self, page_number: u32) -> Self {
        Self { page_number, ..self.clone() }
    }

    /// Query parameters in the order the web frontend sends them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("language", self.language.clone()),
            ("q", self.query.clone()),
            ("orderBy", self.order_by.clone()),
            ("pageNumber", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("orSearchFallback", self.or_search_fallback.to_string()),
            ("showJumpLabels", self.show_jump_labels.to_string()),
            ("findEventVariable", self.event_id.clone()),
        ]
    }

    /// URL-encoded query string without the leading `?`.
    pub fn query_string(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Returns the hit list of a search response.
///
/// A missing `result`, missing `hits`, or a non-array `hits` all count as an empty page.
pub fn hits(response: &Value) -> &[Value] {
    response["result"]["hits"].as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// A single scalar in a flattened row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Integer(i64),
}

impl Cell {
    /// Returns the text value, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Integer(_) => None,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Text(String::new())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Integer(n)
    }
}

/// One exhibitor as a flat, ordered row of named cells.
///
/// Column order is insertion order, which the CSV export uses for its header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlatRecord {
    cells: IndexMap<String, Cell>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column, keeping its original position if it already exists.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Text of a column, or `""` when absent or numeric.
    pub fn text(&self, column: &str) -> &str {
        self.get(column).and_then(Cell::as_str).unwrap_or("")
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
