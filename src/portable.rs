//! Portable worksheet file: versioned JSON for export/import round trips.
//!
//! ```text
//! {
//!   "version": 1,
//!   "exported_at": "2026-10-16T09:30:00Z",
//!   "budget": "500000",
//!   "holdings": [
//!     { "name": "KODEX 200", "price": "35000", "qty": "12", "ratio": "40" }
//!   ]
//! }
//! ```
//!
//! Numeric fields are plain digit strings with any presentation formatting
//! removed. The loader is lenient about everything except the `holdings`
//! array: missing fields fall back to blanks, numbers are accepted where
//! strings are expected.
//!
//! # Usage
//!
//! ```ignore
//! use topup::Worksheet;
//! use std::path::Path;
//!
//! let mut ws = Worksheet::load(Path::new("portfolio.json")).unwrap();
//! ws.budget = "600000".into();
//! ws.save(Path::new("portfolio.json")).unwrap();
//! ```

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::validate::digits_only;
use crate::worksheet::{HoldingDraft, Worksheet};

/// Highest file format version this crate reads and the one it writes.
pub const FORMAT_VERSION: u64 = 1;

/// Errors raised while importing a portable file.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Not JSON, not an object, no `holdings` array, or an unknown version.
    #[error("malformed import file: {0}")]
    MalformedImportFile(String),

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// In-memory form of the portable file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PortableFile {
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    pub budget: String,
    pub holdings: Vec<HoldingDraft>,
}

impl PortableFile {
    /// Snapshot a worksheet, stripping formatting from numeric fields.
    pub fn from_worksheet(ws: &Worksheet, exported_at: DateTime<Utc>) -> Self {
        let holdings = ws
            .rows
            .iter()
            .map(|r| HoldingDraft {
                name: r.name.trim().to_string(),
                price: digits_only(&r.price),
                qty: digits_only(&r.qty),
                ratio: r.ratio.trim().to_string(),
            })
            .collect();

        Self {
            version: FORMAT_VERSION,
            exported_at: Some(exported_at),
            budget: digits_only(&ws.budget),
            holdings,
        }
    }

    /// Pretty-printed JSON, two-space indent.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a portable file leniently.
    ///
    /// Only a missing or non-array `holdings` field, invalid JSON, a
    /// non-object document, or a future `version` is an error.
    pub fn parse(json: &str) -> Result<Self, ImportError> {
        let doc: Value = serde_json::from_str(json)
            .map_err(|e| ImportError::MalformedImportFile(format!("invalid JSON: {e}")))?;
        let obj = doc.as_object().ok_or_else(|| {
            ImportError::MalformedImportFile("document is not a JSON object".into())
        })?;

        let version = match obj.get("version") {
            None | Some(Value::Null) => FORMAT_VERSION,
            Some(v) => v.as_u64().ok_or_else(|| {
                ImportError::MalformedImportFile(format!("invalid version: {v}"))
            })?,
        };
        if version > FORMAT_VERSION {
            return Err(ImportError::MalformedImportFile(format!(
                "unsupported version {version} (newest supported is {FORMAT_VERSION})"
            )));
        }

        let rows = obj
            .get("holdings")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ImportError::MalformedImportFile("missing \"holdings\" array".into())
            })?;

        let holdings = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                if !row.is_object() {
                    warn!("holding #{} is not an object, importing as blank", i + 1);
                }
                let ratio = text_field(row, "ratio");
                HoldingDraft {
                    name: text_field(row, "name"),
                    price: text_field(row, "price"),
                    qty: text_field(row, "qty"),
                    ratio: if ratio.is_empty() { "0".into() } else { ratio },
                }
            })
            .collect();

        let exported_at = obj
            .get("exported_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));

        Ok(Self {
            version,
            exported_at,
            budget: text_field(&doc, "budget"),
            holdings,
        })
    }

    /// Write as pretty JSON to `path`.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = self
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json + "\n")
    }

    /// Read and parse a portable file from disk.
    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ImportError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents)
    }
}

/// Suggested file name for an export made on `date`.
pub fn default_file_name(date: NaiveDate) -> String {
    format!("portfolio-{}.json", date.format("%Y-%m-%d"))
}

/// Text of `row[key]`: strings as-is, numbers and booleans as plain text,
/// anything else (missing, null, arrays, objects) as blank.
fn text_field(row: &Value, key: &str) -> String {
    row.get(key).map(text_field_value).unwrap_or_default()
}

fn text_field_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

impl Worksheet {
    /// Export the worksheet as a portable file stamped with the current time.
    pub fn export(&self) -> PortableFile {
        PortableFile::from_worksheet(self, Utc::now())
    }

    /// Replace this worksheet's rows (and budget, when the file carries a
    /// non-zero one) with the file's contents.
    ///
    /// Returns the number of imported rows.
    pub fn apply(&mut self, file: PortableFile) -> usize {
        let budget = digits_only(&file.budget);
        if budget.chars().any(|c| c != '0') {
            self.budget = budget;
        }
        self.rows = file.holdings;
        self.rows.len()
    }

    /// Import a portable document. On error the worksheet is left untouched.
    pub fn import_json(&mut self, json: &str) -> Result<usize, ImportError> {
        let file = PortableFile::parse(json)?;
        Ok(self.apply(file))
    }

    /// Export to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        self.export().save(path)
    }

    /// Load a worksheet from a portable file.
    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let mut ws = Worksheet::default();
        ws.apply(PortableFile::load(path)?);
        Ok(ws)
    }
}
