//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services as an
//! `Arc<CoreConfig>`. Core code never reads environment variables while handling session events;
//! the binary reads them and hands the raw values to the parsing helpers below.

use crate::constants::{DEFAULT_EXAM_LEAD_DAYS, DEFAULT_RECORD_DIR, MAX_EXAM_LEAD_DAYS};
use crate::{RecordError, RecordResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    record_dir: PathBuf,
    exam_lead_days: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidInput`] if `record_dir` is empty or `exam_lead_days`
    /// exceeds [`MAX_EXAM_LEAD_DAYS`].
    pub fn new(record_dir: PathBuf, exam_lead_days: u32) -> RecordResult<Self> {
        if record_dir.as_os_str().is_empty() {
            return Err(RecordError::InvalidInput(
                "record_dir cannot be empty".into(),
            ));
        }

        if exam_lead_days > MAX_EXAM_LEAD_DAYS {
            return Err(RecordError::InvalidInput(format!(
                "exam_lead_days must be at most {MAX_EXAM_LEAD_DAYS}, got {exam_lead_days}"
            )));
        }

        Ok(Self {
            record_dir,
            exam_lead_days,
        })
    }

    /// Directory holding the flat intake and scan files.
    pub fn record_dir(&self) -> &Path {
        &self.record_dir
    }

    pub fn exam_lead_days(&self) -> u32 {
        self.exam_lead_days
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            record_dir: PathBuf::from(DEFAULT_RECORD_DIR),
            exam_lead_days: DEFAULT_EXAM_LEAD_DAYS,
        }
    }
}

/// Resolve the record directory from an optional raw value.
///
/// `None` or a blank value falls back to [`DEFAULT_RECORD_DIR`].
pub fn record_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORD_DIR))
}

/// Parse the exam lead time from an optional raw value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_EXAM_LEAD_DAYS`].
pub fn exam_lead_days_from_env_value(value: Option<String>) -> RecordResult<u32> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_EXAM_LEAD_DAYS),
        Some(v) => v.parse::<u32>().map_err(|e| {
            RecordError::InvalidInput(format!("exam lead days '{v}' is not a whole number: {e}"))
        }),
    }
}
