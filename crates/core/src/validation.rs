//! Record presence checks and input guardrails.
//!
//! [`Validator`] answers the existence predicates that gate patient login. The free function
//! [`validate_record_key_safe_for_path`] guards every place where caller text becomes part of a
//! file name.

use crate::config::CoreConfig;
use crate::records::RecordKind;
use crate::store::RecordStore;
use crate::{RecordError, RecordResult};
use std::fs::File;
use std::sync::Arc;

/// Validates that a record key can be embedded in a file name without leaving the record
/// directory.
///
/// Keys are otherwise opaque: technician input is not required to be a canonical
/// [`PatientId`](crate::PatientId). This only rejects:
/// - empty keys
/// - keys containing `/`, `\` or NUL
/// - the relative components `.` and `..`
///
/// # Errors
///
/// Returns [`RecordError::InvalidInput`] if the key is unsafe.
pub fn validate_record_key_safe_for_path(key: &str) -> RecordResult<()> {
    if key.is_empty() {
        return Err(RecordError::InvalidInput("record key cannot be empty".into()));
    }

    if key == "." || key == ".." {
        return Err(RecordError::InvalidInput(format!(
            "record key '{key}' is a relative path component"
        )));
    }

    if key.contains(['/', '\\', '\0']) {
        return Err(RecordError::InvalidInput(format!(
            "record key '{}' contains path separators",
            key.escape_default()
        )));
    }

    Ok(())
}

/// Existence predicates over the record store. No content validation.
#[derive(Clone, Debug)]
pub struct Validator {
    store: RecordStore,
}

impl Validator {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            store: RecordStore::new(cfg),
        }
    }

    /// True iff a readable intake record exists for `identifier`.
    pub fn intake_exists(&self, identifier: &str) -> bool {
        self.exists(RecordKind::Intake, identifier)
    }

    /// True iff a readable scan record exists for `identifier`.
    pub fn scan_exists(&self, identifier: &str) -> bool {
        self.exists(RecordKind::Scan, identifier)
    }

    fn exists(&self, kind: RecordKind, identifier: &str) -> bool {
        let Ok(path) = self.store.path_for(kind, identifier) else {
            return false;
        };

        // Opening proves readability; the handle is dropped immediately.
        path.is_file() && File::open(&path).is_ok()
    }
}
