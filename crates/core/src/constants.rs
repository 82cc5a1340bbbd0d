//! Constants used throughout the heart core crate.
//!
//! Record labels and file-name suffixes live here so the on-disk layout is defined in one
//! place. The labels are part of the persisted format and must not change.

/// Default directory for record files when no explicit directory is configured.
pub const DEFAULT_RECORD_DIR: &str = "patient_data";

/// Days between intake and the scheduled exam.
pub const DEFAULT_EXAM_LEAD_DAYS: u32 = 3;

/// Upper bound accepted for a configured exam lead time.
pub const MAX_EXAM_LEAD_DAYS: u32 = 365;

/// `chrono` format string for exam dates (`MM/dd/yyyy`).
pub const EXAM_DATE_FORMAT: &str = "%m/%d/%Y";

/// Suffix appended to the identifier to name an intake file.
pub const INTAKE_FILE_SUFFIX: &str = "_PatientInfo.txt";

/// Suffix appended to the identifier to name a scan file (no separator).
pub const SCAN_FILE_SUFFIX: &str = "CTResults.txt";

/// Line terminator used between `Label: value` lines.
pub const LINE_TERMINATOR: &str = "\n";

pub const PATIENT_ID_LABEL: &str = "Patient ID";
pub const FIRST_NAME_LABEL: &str = "First Name";
pub const LAST_NAME_LABEL: &str = "Last Name";
pub const EMAIL_LABEL: &str = "Email";
pub const PHONE_LABEL: &str = "Phone Number";
pub const HEALTH_HISTORY_LABEL: &str = "Health History";
pub const INSURANCE_ID_LABEL: &str = "Insurance ID";
pub const EXAM_DATE_LABEL: &str = "Exam Date";

pub const TOTAL_SCORE_LABEL: &str = "Total Agatston CAC score";
pub const LM_SCORE_LABEL: &str = "LM Score";
pub const LAD_SCORE_LABEL: &str = "LAD Score";
pub const LCX_SCORE_LABEL: &str = "LCX Score";
pub const RCA_SCORE_LABEL: &str = "RCA Score";
pub const PDA_SCORE_LABEL: &str = "PDA Score";
