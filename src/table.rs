// 📋 Reference Table - typed rows + CSV loader
// Turns the ranked comparison CSV into a sorted, immutable ReferenceTable.
//
// Expected header: value, comparison, catagory (or category), image link

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// CORE TYPES
// ============================================================================

/// One row of the ranked table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Ranking metric in USD (always finite and >= 0)
    pub value: f64,

    /// Display name ("comparison" column)
    pub label: String,

    /// Grouping text shown as "or the {category}..."
    pub category: String,

    /// Opaque asset reference (URL or path), never interpreted here
    pub image_ref: String,
}

impl ReferenceEntry {
    pub fn new(value: f64, label: &str, category: &str, image_ref: &str) -> Self {
        ReferenceEntry {
            value,
            label: label.to_string(),
            category: category.to_string(),
            image_ref: image_ref.to_string(),
        }
    }
}

/// Entries ordered non-decreasing by `value`.
///
/// The only ways to build one are [`ReferenceTable::sorted`] (sorts) and
/// [`ReferenceTable::from_sorted`] (validates), so the ordering invariant
/// holds for every instance the selector sees.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceTable {
    /// Sort ascending by value. Stable, so ties keep file order.
    pub fn sorted(mut entries: Vec<ReferenceEntry>) -> Self {
        entries.sort_by(|a, b| a.value.total_cmp(&b.value));
        ReferenceTable { entries }
    }

    /// Accept entries that are already non-decreasing with finite,
    /// non-negative values; reject anything else
    pub fn from_sorted(entries: Vec<ReferenceEntry>) -> Result<Self, TableError> {
        if let Some(index) = entries
            .iter()
            .position(|e| !e.value.is_finite() || e.value < 0.0)
        {
            return Err(TableError::InvalidValue {
                index,
                value: entries[index].value,
            });
        }
        if let Some(index) = entries.windows(2).position(|w| w[0].value > w[1].value) {
            return Err(TableError::Unsorted {
                index: index + 1,
                previous: entries[index].value,
                next: entries[index + 1].value,
            });
        }
        Ok(ReferenceTable { entries })
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ReferenceEntry> {
        self.entries.get(index)
    }

    /// Entry with the largest value (the last one)
    pub fn max_entry(&self) -> Option<&ReferenceEntry> {
        self.entries.last()
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// A single CSV row that could not become a ReferenceEntry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("line {line}: missing `{field}`")]
    MissingField { line: u64, field: &'static str },

    #[error("line {line}: cannot parse value {raw:?}")]
    InvalidValue { line: u64, raw: String },

    #[error("line {line}: value {value} is negative")]
    NegativeValue { line: u64, value: f64 },

    #[error("line {line}: {message}")]
    Malformed { line: u64, message: String },
}

impl RowError {
    pub fn line(&self) -> u64 {
        match self {
            RowError::MissingField { line, .. }
            | RowError::InvalidValue { line, .. }
            | RowError::NegativeValue { line, .. }
            | RowError::Malformed { line, .. } => *line,
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("entries out of order at index {index}: {previous} > {next}")]
    Unsorted { index: usize, previous: f64, next: f64 },

    #[error("entry {index} has invalid value {value}")]
    InvalidValue { index: usize, value: f64 },
}

// ============================================================================
// LOADER
// ============================================================================

/// Loaded table plus the rows that were rejected on the way
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub table: ReferenceTable,
    pub rejected: Vec<RowError>,
}

impl LoadReport {
    pub fn summary(&self) -> String {
        format!(
            "{} entries loaded, {} rows rejected",
            self.table.len(),
            self.rejected.len()
        )
    }
}

/// Raw CSV row, before any typing. The `catagory` spelling is what the
/// published data file actually uses.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    value: Option<String>,

    #[serde(default)]
    comparison: Option<String>,

    #[serde(rename = "catagory", alias = "category", default)]
    category: Option<String>,

    #[serde(rename = "image link", alias = "image_link", default)]
    image_link: Option<String>,
}

impl RawRow {
    fn is_blank(&self) -> bool {
        [&self.value, &self.comparison, &self.category, &self.image_link]
            .iter()
            .all(|field| field.as_deref().map_or(true, |s| s.trim().is_empty()))
    }

    fn into_entry(self, line: u64) -> Result<ReferenceEntry, RowError> {
        let raw_value = non_empty(self.value).ok_or(RowError::MissingField {
            line,
            field: "value",
        })?;
        let label = non_empty(self.comparison).ok_or(RowError::MissingField {
            line,
            field: "comparison",
        })?;

        let value = parse_value(&raw_value).ok_or_else(|| RowError::InvalidValue {
            line,
            raw: raw_value.clone(),
        })?;
        if value < 0.0 {
            return Err(RowError::NegativeValue { line, value });
        }

        Ok(ReferenceEntry {
            value,
            label,
            category: non_empty(self.category).unwrap_or_default(),
            image_ref: non_empty(self.image_link).unwrap_or_default(),
        })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a magnitude like "1,250,000" or "$5,000" into a plain number.
/// Returns None for anything that is not a finite number.
pub fn parse_value(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse CSV from any reader into a sorted table.
///
/// Bad rows are collected into `rejected` instead of failing the load;
/// only unreadable input or a missing required column is fatal.
pub fn parse_table<R: Read>(reader: R) -> Result<LoadReport, TableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for required in ["value", "comparison"] {
        if !headers.iter().any(|h| h == required) {
            return Err(TableError::MissingColumn(required));
        }
    }

    let mut entries = Vec::new();
    let mut rejected = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let raw: RawRow = match record.deserialize(Some(&headers)) {
            Ok(raw) => raw,
            Err(e) => {
                reject(
                    &mut rejected,
                    RowError::Malformed {
                        line,
                        message: e.to_string(),
                    },
                );
                continue;
            }
        };

        if raw.is_blank() {
            continue;
        }

        match raw.into_entry(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => reject(&mut rejected, e),
        }
    }

    Ok(LoadReport {
        table: ReferenceTable::sorted(entries),
        rejected,
    })
}

fn reject(rejected: &mut Vec<RowError>, error: RowError) {
    log::warn!("Skipping table row: {}", error);
    rejected.push(error);
}

pub fn parse_table_str(text: &str) -> Result<LoadReport, TableError> {
    parse_table(text.as_bytes())
}

pub fn load_table_csv(csv_path: &Path) -> Result<LoadReport, TableError> {
    let file = std::fs::File::open(csv_path).map_err(csv::Error::from)?;
    let report = parse_table(file)?;
    log::debug!("Loaded {}: {}", csv_path.display(), report.summary());
    Ok(report)
}
