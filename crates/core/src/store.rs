//! Flat-file record persistence.
//!
//! Intake and scan records are stored as `Label: value` text files directly under the
//! configured record directory:
//!
//! ```text
//! <record_dir>/
//!   12345_PatientInfo.txt   # intake record
//!   12345CTResults.txt      # scan record
//! ```
//!
//! There is no index and no locking. Lookup is always by exact identifier, writes overwrite
//! whatever was stored under the same identifier, and the last writer wins.
//!
//! ## Two call styles
//!
//! - `try_*` operations return [`RecordResult`] and distinguish
//!   [`RecordError::RecordNotFound`] from [`RecordError::StorageIo`].
//! - [`RecordStore::write_intake`], [`RecordStore::write_scan`],
//!   [`RecordStore::read_intake_name`] and [`RecordStore::read_scan`] log and swallow every
//!   failure. Reads then yield an empty name or an empty score map. Check presence with
//!   [`Validator`](crate::validation::Validator) before relying on their results.

use crate::config::CoreConfig;
use crate::paths::record_path;
use crate::records::{IntakeRecord, PatientName, RecordKind, ScanRecord, ScoreMap};
use crate::text::{IntakeText, ScanText, UNESCAPED_FREE_TEXT};
use crate::validation::validate_record_key_safe_for_path;
use crate::{RecordError, RecordResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads and writes intake and scan files.
#[derive(Clone, Debug)]
pub struct RecordStore {
    cfg: Arc<CoreConfig>,
}

impl RecordStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    pub fn record_dir(&self) -> &Path {
        self.cfg.record_dir()
    }

    /// Resolves the file path of a record after checking the key is a safe file-name part.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidInput`] for keys that could escape the record directory.
    pub fn path_for(&self, kind: RecordKind, identifier: &str) -> RecordResult<PathBuf> {
        validate_record_key_safe_for_path(identifier)?;
        Ok(record_path(self.cfg.record_dir(), kind, identifier))
    }

    // ========================================================================
    // TYPED OPERATIONS
    // ========================================================================

    /// Writes the intake file for `record.id`, replacing any previous content.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::StorageIo`] if the record directory cannot be created or the file
    /// cannot be written.
    pub fn try_write_intake(&self, record: &IntakeRecord) -> RecordResult<PathBuf> {
        let identifier = record.id.to_string();
        let path = self.path_for(RecordKind::Intake, &identifier)?;

        let unescaped = IntakeText::unescaped_fields(record);
        if !unescaped.is_empty() {
            tracing::warn!(
                identifier = %identifier,
                fields = ?unescaped,
                "{UNESCAPED_FREE_TEXT}"
            );
        }

        self.write_file(&path, &IntakeText::render(record))?;
        tracing::info!(identifier = %identifier, path = %path.display(), "intake record written");
        Ok(path)
    }

    /// Writes the scan file for `record.identifier`, replacing any previous content.
    ///
    /// No intake record is required to exist for the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidInput`] for an unsafe identifier, or
    /// [`RecordError::StorageIo`] if the file cannot be written.
    pub fn try_write_scan(&self, record: &ScanRecord) -> RecordResult<PathBuf> {
        let identifier = record.identifier.as_str();
        let path = self.path_for(RecordKind::Scan, identifier)?;

        let unescaped = ScanText::unescaped_fields(record);
        if !unescaped.is_empty() {
            tracing::warn!(identifier, fields = ?unescaped, "{UNESCAPED_FREE_TEXT}");
        }

        self.write_file(&path, &ScanText::render(record))?;
        tracing::info!(identifier, path = %path.display(), "scan record written");
        Ok(path)
    }

    /// Reads first and last name from the intake file for `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::RecordNotFound`] if no intake file exists, or
    /// [`RecordError::StorageIo`] if it cannot be read.
    pub fn try_read_intake_name(&self, identifier: &str) -> RecordResult<PatientName> {
        let text = self.read_file(RecordKind::Intake, identifier)?;
        Ok(IntakeText::parse_name(&text))
    }

    /// Reads the six score lines from the scan file for `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::RecordNotFound`] if no scan file exists, or
    /// [`RecordError::StorageIo`] if it cannot be read.
    pub fn try_read_scan(&self, identifier: &str) -> RecordResult<ScoreMap> {
        let text = self.read_file(RecordKind::Scan, identifier)?;
        Ok(ScanText::parse_scores(&text))
    }

    // ========================================================================
    // SWALLOWING OPERATIONS
    // ========================================================================

    /// Writes the intake file; failures are logged and dropped.
    pub fn write_intake(&self, record: &IntakeRecord) {
        if let Err(e) = self.try_write_intake(record) {
            log_swallowed("write_intake", &e);
        }
    }

    /// Writes the scan file; failures are logged and dropped.
    pub fn write_scan(&self, record: &ScanRecord) {
        if let Err(e) = self.try_write_scan(record) {
            log_swallowed("write_scan", &e);
        }
    }

    /// Reads the patient name, yielding empty parts when the record is absent or unreadable.
    pub fn read_intake_name(&self, identifier: &str) -> PatientName {
        self.try_read_intake_name(identifier).unwrap_or_else(|e| {
            log_swallowed("read_intake_name", &e);
            PatientName::default()
        })
    }

    /// Reads the scores, yielding an empty map when the record is absent or unreadable.
    pub fn read_scan(&self, identifier: &str) -> ScoreMap {
        self.try_read_scan(identifier).unwrap_or_else(|e| {
            log_swallowed("read_scan", &e);
            ScoreMap::new()
        })
    }

    // ========================================================================
    // FILE ACCESS
    // ========================================================================

    fn write_file(&self, path: &Path, contents: &str) -> RecordResult<()> {
        let storage_io = |source| RecordError::StorageIo {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(self.cfg.record_dir()).map_err(storage_io)?;
        fs::write(path, contents).map_err(storage_io)
    }

    fn read_file(&self, kind: RecordKind, identifier: &str) -> RecordResult<String> {
        let path = self.path_for(kind, identifier)?;

        fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => RecordError::RecordNotFound {
                kind,
                identifier: identifier.to_owned(),
            },
            _ => RecordError::StorageIo { path, source },
        })
    }
}

fn log_swallowed(operation: &str, error: &RecordError) {
    if error.is_not_found() {
        tracing::warn!(operation, "{error}");
    } else {
        tracing::error!(operation, "{error}");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::identifier::PatientId;
    use crate::records::tests::{jane_doe_form, scan_form};
    use crate::records::ScoreLabel;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    pub(crate) fn test_cfg(record_dir: &Path) -> Arc<CoreConfig> {
        Arc::new(
            CoreConfig::new(record_dir.to_path_buf(), 3).expect("CoreConfig::new should succeed"),
        )
    }

    fn intake(id: &str, first: &str, last: &str) -> IntakeRecord {
        let form = crate::records::IntakeForm {
            first_name: first.into(),
            last_name: last.into(),
            ..jane_doe_form()
        };
        IntakeRecord::from_form(
            PatientId::parse(id).unwrap(),
            &form,
            NaiveDate::from_ymd_opt(2023, 6, 4).unwrap(),
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_write_intake_then_read_name_round_trips() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::new(test_cfg(temp_dir.path()));

        store.write_intake(&intake("12345", "Jane", "Doe"));

        let name = store.read_intake_name("12345");
        assert_eq!(name.first, "Jane");
        assert_eq!(name.last, "Doe");
        assert!(temp_dir.path().join("12345_PatientInfo.txt").is_file());
    }

    #[test]
    fn test_write_scan_then_read_scan_round_trips() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::new(test_cfg(temp_dir.path()));
        let record = ScanRecord::from_form(&scan_form("12345")).unwrap();

        store.write_scan(&record);

        let scores = store.read_scan("12345");
        assert_eq!(scores, record.scores.to_score_map());
        assert!(temp_dir.path().join("12345CTResults.txt").is_file());
    }

    #[test]
    fn test_write_overwrites_previous_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::new(test_cfg(temp_dir.path()));

        store.write_intake(&intake("12345", "Jane", "Doe"));
        store.write_intake(&intake("12345", "John", "Roe"));

        let name = store.read_intake_name("12345");
        assert_eq!(name.full_name(), "John Roe");
    }

    #[test]
    fn test_scan_can_be_written_without_intake() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::new(test_cfg(temp_dir.path()));

        store
            .try_write_scan(&ScanRecord::from_form(&scan_form("55555")).unwrap())
            .expect("scan write should not require an intake record");

        assert_eq!(store.read_intake_name("55555"), PatientName::default());
        assert_eq!(store.read_scan("55555")[&ScoreLabel::Total], "120");
    }

    #[test]
    fn test_missing_records_read_as_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::new(test_cfg(temp_dir.path()));

        assert_eq!(store.read_intake_name("99999"), PatientName::default());
        assert!(store.read_scan("99999").is_empty());
    }

    #[test]
    fn test_try_read_distinguishes_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::new(test_cfg(temp_dir.path()));

        let err = store.try_read_intake_name("99999").unwrap_err();
        assert!(matches!(
            err,
            RecordError::RecordNotFound {
                kind: RecordKind::Intake,
                ..
            }
        ));

        let err = store.try_read_scan("99999").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unreadable_record_is_storage_io() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::new(test_cfg(temp_dir.path()));

        // A directory in place of the file cannot be read as text.
        fs::create_dir(temp_dir.path().join("12345CTResults.txt")).unwrap();

        let err = store.try_read_scan("12345").unwrap_err();
        assert!(matches!(err, RecordError::StorageIo { .. }));
        assert!(store.read_scan("12345").is_empty());
    }

    #[test]
    fn test_write_into_unwritable_location_is_swallowed() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        // Record dir path is occupied by a regular file.
        let blocked = temp_dir.path().join("blocked");
        fs::write(&blocked, "not a directory").unwrap();
        let store = RecordStore::new(test_cfg(&blocked));

        let record = intake("12345", "Jane", "Doe");
        let err = store.try_write_intake(&record).unwrap_err();
        assert!(matches!(err, RecordError::StorageIo { .. }));

        store.write_intake(&record);
        assert_eq!(store.read_intake_name("12345"), PatientName::default());
    }

    #[test]
    fn test_write_creates_missing_record_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("clinic").join("records");
        let store = RecordStore::new(test_cfg(&nested));

        let path = store
            .try_write_intake(&intake("12345", "Jane", "Doe"))
            .expect("write should create the record directory");
        assert_eq!(path, nested.join("12345_PatientInfo.txt"));
    }

    #[test]
    fn test_unsafe_keys_never_touch_the_file_system() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::new(test_cfg(temp_dir.path()));

        let record = ScanRecord::from_form(&scan_form("../escape")).unwrap();
        let err = store.try_write_scan(&record).unwrap_err();
        assert!(matches!(err, RecordError::InvalidInput(_)));
        assert!(!temp_dir.path().join("..").join("escapeCTResults.txt").exists());

        assert!(matches!(
            store.try_read_intake_name("a/b").unwrap_err(),
            RecordError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_persisted_files_have_expected_line_counts() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::new(test_cfg(temp_dir.path()));

        store.write_intake(&intake("12345", "Jane", "Doe"));
        store.write_scan(&ScanRecord::from_form(&scan_form("12345")).unwrap());

        let intake_text = fs::read_to_string(temp_dir.path().join("12345_PatientInfo.txt")).unwrap();
        let scan_text = fs::read_to_string(temp_dir.path().join("12345CTResults.txt")).unwrap();
        assert_eq!(intake_text.lines().count(), 8);
        assert_eq!(scan_text.lines().count(), 7);
        assert!(intake_text.ends_with("Exam Date: 06/07/2023"));
    }
}
