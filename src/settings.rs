//! Persistent settings: the last names, image paths, and rows a user entered.
//!
//! Stored as a pretty-printed UTF-8 JSON object:
//!
//! ```json
//! {
//!   "left_img": "left.png",
//!   "right_img": "right.png",
//!   "left_name": "Rick Astley",
//!   "right_name": "_rickroll",
//!   "labels": ["INSTA followers", "Age", "Net worth"],
//!   "left_values": ["690k", "23 years", "460k"],
//!   "right_values": ["115", "7 days", "1€"]
//! }
//! ```
//!
//! Loading never fails. A missing or unreadable file yields the defaults;
//! missing, null, or empty fields are filled from the defaults one by one.
//! The three row arrays are all-or-nothing: unless all three are present
//! and have exactly the default row count, all three are replaced.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compose::{ComparisonRow, CompositionInput};
use crate::scene::ImageHandle;

/// File name used when no other path is configured.
pub const DEFAULT_SETTINGS_FILE: &str = "vs_config.json";

/// Everything the user enters for one image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// Path of the left image.
    #[serde(rename = "left_img")]
    pub left_image: String,
    /// Path of the right image.
    #[serde(rename = "right_img")]
    pub right_image: String,
    /// Left contender's name.
    pub left_name: String,
    /// Right contender's name.
    pub right_name: String,
    /// Row labels.
    pub labels: Vec<String>,
    /// Left values, one per label.
    pub left_values: Vec<String>,
    /// Right values, one per label.
    pub right_values: Vec<String>,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| String::from(*s)).collect();
        Self {
            left_image: String::from("left.png"),
            right_image: String::from("right.png"),
            left_name: String::from("Rick Astley"),
            right_name: String::from("_rickroll"),
            labels: strings(&["INSTA followers", "Age", "Net worth"]),
            left_values: strings(&["690k", "23 years", "460k"]),
            right_values: strings(&["115", "7 days", "1€"]),
        }
    }
}

impl SettingsRecord {
    /// Number of complete rows.
    pub fn row_count(&self) -> usize {
        self.labels
            .len()
            .min(self.left_values.len())
            .min(self.right_values.len())
    }

    /// The row arrays zipped into rows. Extra entries in longer arrays are
    /// ignored.
    pub fn rows(&self) -> Vec<ComparisonRow> {
        self.labels
            .iter()
            .zip(&self.left_values)
            .zip(&self.right_values)
            .map(|((label, left), right)| ComparisonRow::new(label, left, right))
            .collect()
    }

    /// Replace the three row arrays.
    pub fn set_rows(&mut self, rows: &[ComparisonRow]) {
        self.labels = rows.iter().map(|r| r.label.clone()).collect();
        self.left_values = rows.iter().map(|r| r.left_value.clone()).collect();
        self.right_values = rows.iter().map(|r| r.right_value.clone()).collect();
    }

    /// Build composer input with the given prepared image handles.
    pub fn to_input(&self, left: ImageHandle, right: ImageHandle) -> CompositionInput {
        CompositionInput::new(&self.left_name, &self.right_name)
            .images(left, right)
            .rows(self.rows())
    }

    /// Fill gaps in a stored record from `defaults`.
    fn merge(stored: StoredRecord, defaults: &SettingsRecord) -> Self {
        let scalar = |v: Option<String>, d: &String| {
            v.filter(|s| !s.is_empty()).unwrap_or_else(|| d.clone())
        };

        let expected = defaults.labels.len();
        let rows = match (stored.labels, stored.left_values, stored.right_values) {
            (Some(l), Some(lv), Some(rv))
                if keeps_rows(expected, l.len()) && lv.len() == l.len() && rv.len() == l.len() =>
            {
                Some((l, lv, rv))
            }
            _ => None,
        };
        let (labels, left_values, right_values) = rows.unwrap_or_else(|| {
            tracing::debug!(expected, "stored rows unusable, substituting defaults");
            (
                defaults.labels.clone(),
                defaults.left_values.clone(),
                defaults.right_values.clone(),
            )
        });

        Self {
            left_image: scalar(stored.left_img, &defaults.left_image),
            right_image: scalar(stored.right_img, &defaults.right_image),
            left_name: scalar(stored.left_name, &defaults.left_name),
            right_name: scalar(stored.right_name, &defaults.right_name),
            labels,
            left_values,
            right_values,
        }
    }
}

/// Stored row arrays survive a load only at the default row count.
fn keeps_rows(default_count: usize, count: usize) -> bool {
    default_count > 0 && count == default_count
}

/// Lenient on-disk shape: every field optional, nulls allowed, unknown keys
/// ignored.
#[derive(Debug, Default, Deserialize)]
struct StoredRecord {
    left_img: Option<String>,
    right_img: Option<String>,
    left_name: Option<String>,
    right_name: Option<String>,
    labels: Option<Vec<String>>,
    left_values: Option<Vec<String>>,
    right_values: Option<Vec<String>>,
}

/// Settings persistence error.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Writing or renaming the file failed.
    #[error("cannot write settings to {}: {source}", path.display())]
    Io {
        /// File being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The record could not be serialized.
    #[error("cannot encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A settings file plus the defaults used to repair it.
#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
    defaults: SettingsRecord,
}

impl SettingsStore {
    /// Store at `path` with the built-in defaults.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            defaults: SettingsRecord::default(),
        }
    }

    /// Replace the defaults used by [`load`](Self::load).
    pub fn with_defaults(mut self, defaults: SettingsRecord) -> Self {
        self.defaults = defaults;
        self
    }

    /// Settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Defaults used to repair loaded records.
    pub fn defaults(&self) -> &SettingsRecord {
        &self.defaults
    }

    /// True when `count` saved rows will come back from [`load`](Self::load).
    /// Any other count is replaced by the default rows on the next load.
    pub fn keeps_row_count(&self, count: usize) -> bool {
        keeps_rows(self.defaults.labels.len(), count)
    }

    /// Load the record, repairing it from the defaults.
    pub fn load(&self) -> SettingsRecord {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
                return self.defaults.clone();
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %err,
                    "cannot read settings, using defaults"
                );
                return self.defaults.clone();
            }
        };
        match serde_json::from_str::<StoredRecord>(&text) {
            Ok(stored) => {
                tracing::debug!(path = %self.path.display(), "loaded settings");
                SettingsRecord::merge(stored, &self.defaults)
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %err,
                    "malformed settings, using defaults"
                );
                self.defaults.clone()
            }
        }
    }

    /// Overwrite the file with `record`.
    ///
    /// Writes a sibling `.tmp` file first and renames it into place, so a
    /// reader never sees a half-written record.
    pub fn save(&self, record: &SettingsRecord) -> Result<(), SettingsError> {
        let mut json = serde_json::to_string_pretty(record)?;
        json.push('\n');

        let tmp = self.temp_path();
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            io_err(source)
        })?;
        tracing::debug!(path = %self.path.display(), rows = record.row_count(), "saved settings");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_FILE)
    }
}
