//! crates/app_review_core/src/domain.rs
//!
//! Defines the pure, core data structures for the review client.
//! These types are independent of any transport or serialization format.

use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Platform & View Mode
//=========================================================================================

/// The app-store source scoping which review dataset is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    #[default]
    Android,
    Ios,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Android, Platform::Ios];

    /// The path segment used by the backend for this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }

    /// The label shown on the platform selector.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            other => Err(format!("'{}' is not a known platform", other)),
        }
    }
}

/// How tabular data is presented: a plain table or a grid of cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(ViewMode::Table),
            "cards" => Ok(ViewMode::Cards),
            other => Err(format!("'{}' is not a known view mode", other)),
        }
    }
}

//=========================================================================================
// Semi-structured Records
//=========================================================================================

/// A single scalar value inside a review record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// An ordered mapping of field name to scalar value.
///
/// Field order is insertion order; inserting an existing name replaces its
/// value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style variant of [`Record::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

//=========================================================================================
// Table Snapshots
//=========================================================================================

/// A record adopted into a snapshot, tagged with its synthetic identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: usize,
    pub record: Record,
}

/// An immutable, point-in-time materialization of tabular review data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSnapshot {
    rows: Vec<TableRow>,
}

impl TableSnapshot {
    /// Adopts a raw payload, assigning 0-based positional identifiers.
    ///
    /// Identifiers always restart at 0 for every adoption.
    pub fn adopt(records: Vec<Record>) -> Self {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(id, record)| TableRow { id, record })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in the first row's field order.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.record.field_names().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

//=========================================================================================
// Errors Shown to the User
//=========================================================================================

/// A user-facing failure message. Never carries raw transport text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(n: i64) -> Record {
        Record::new().with("Rating", n)
    }

    #[test]
    fn adopt_assigns_positional_ids_from_zero() {
        let snapshot = TableSnapshot::adopt(vec![rating(5), rating(3)]);
        let ids: Vec<usize> = snapshot.rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1]);

        let again = TableSnapshot::adopt(vec![rating(5), rating(3)]);
        let ids: Vec<usize> = again.rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn record_insert_keeps_order_and_replaces_in_place() {
        let mut record = Record::new().with("Comment", "great").with("Rating", 4i64);
        record.insert("Comment", "crashes on login");
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["Comment", "Rating"]);
        assert_eq!(
            record.get("Comment"),
            Some(&FieldValue::Text("crashes on login".into()))
        );
    }

    #[test]
    fn columns_follow_first_row() {
        let snapshot = TableSnapshot::adopt(vec![
            Record::new().with("Date", "2023-02-01").with("Rating", 2i64),
            Record::new().with("Rating", 5i64).with("Version", "3.2"),
        ]);
        assert_eq!(snapshot.columns(), vec!["Date", "Rating"]);
        assert!(TableSnapshot::default().columns().is_empty());
    }

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("iOS".parse::<Platform>(), Ok(Platform::Ios));
        assert_eq!(" Android ".parse::<Platform>(), Ok(Platform::Android));
        assert!("windows".parse::<Platform>().is_err());
        assert_eq!(Platform::Ios.to_string(), "ios");
    }

    #[test]
    fn null_displays_as_empty() {
        assert_eq!(FieldValue::Null.to_string(), "");
        assert_eq!(FieldValue::Number(4.5).to_string(), "4.5");
        assert_eq!(FieldValue::Number(5.0).to_string(), "5");
    }
}
