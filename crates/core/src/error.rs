use crate::records::RecordKind;

/// Errors raised by record construction and the record store.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingInput { fields: Vec<&'static str> },
    #[error("{kind} record not found for identifier '{identifier}'")]
    RecordNotFound {
        kind: RecordKind,
        identifier: String,
    },
    #[error("storage I/O failed (path: {path}): {source}", path = path.display())]
    StorageIo {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("field error: {0}")]
    Field(#[from] crate::records::FieldError),
}

impl RecordError {
    /// Returns true for the not-found condition, which callers often treat as "absent".
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::RecordNotFound { .. })
    }
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
