//! On-disk file names for record files.
//!
//! Both record kinds live side by side in the configured record directory, named from the
//! identifier. This module contains **no I/O logic**, only file-name construction.
//!
//! The two suffixes differ: intake files use `_PatientInfo.txt` with a separator, scan files
//! use `CTResults.txt` without one. Existing record directories depend on both spellings.

use crate::constants::{INTAKE_FILE_SUFFIX, SCAN_FILE_SUFFIX};
use crate::records::RecordKind;
use std::path::{Path, PathBuf};

/// Intake file naming.
pub struct IntakeFile;

impl IntakeFile {
    /// `"{identifier}_PatientInfo.txt"`
    pub fn name(identifier: &str) -> String {
        format!("{identifier}{INTAKE_FILE_SUFFIX}")
    }
}

/// Scan file naming.
pub struct ScanFile;

impl ScanFile {
    /// `"{identifier}CTResults.txt"`
    pub fn name(identifier: &str) -> String {
        format!("{identifier}{SCAN_FILE_SUFFIX}")
    }
}

/// Full path of the `kind` record for `identifier` under `record_dir`.
///
/// Callers must have checked `identifier` with
/// [`validate_record_key_safe_for_path`](crate::validation::validate_record_key_safe_for_path).
pub fn record_path(record_dir: &Path, kind: RecordKind, identifier: &str) -> PathBuf {
    let file_name = match kind {
        RecordKind::Intake => IntakeFile::name(identifier),
        RecordKind::Scan => ScanFile::name(identifier),
    };
    record_dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_keep_historic_spelling() {
        assert_eq!(IntakeFile::name("12345"), "12345_PatientInfo.txt");
        assert_eq!(ScanFile::name("12345"), "12345CTResults.txt");
    }

    #[test]
    fn test_record_path_joins_record_dir() {
        let dir = Path::new("/data/records");
        assert_eq!(
            record_path(dir, RecordKind::Intake, "12345"),
            PathBuf::from("/data/records/12345_PatientInfo.txt")
        );
        assert_eq!(
            record_path(dir, RecordKind::Scan, "12345"),
            PathBuf::from("/data/records/12345CTResults.txt")
        );
    }
}
