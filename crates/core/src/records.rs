//! Intake and scan record types.
//!
//! Raw caller input arrives as [`IntakeForm`] / [`ScanForm`]. A form is only turned into a
//! persisted record once every required field is present; the validated records hold
//! [`RequiredField`] values so an empty field cannot reach the store.

use crate::constants::{
    EMAIL_LABEL, EXAM_DATE_FORMAT, FIRST_NAME_LABEL, HEALTH_HISTORY_LABEL, INSURANCE_ID_LABEL,
    LAD_SCORE_LABEL, LAST_NAME_LABEL, LCX_SCORE_LABEL, LM_SCORE_LABEL, PATIENT_ID_LABEL,
    PDA_SCORE_LABEL, PHONE_LABEL, RCA_SCORE_LABEL, TOTAL_SCORE_LABEL,
};
use crate::identifier::PatientId;
use crate::{RecordError, RecordResult};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The two persisted record kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Intake,
    Scan,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Intake => f.write_str("intake"),
            RecordKind::Scan => f.write_str("scan"),
        }
    }
}

/// Errors that can occur when creating a required field.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// The input text was empty or contained only whitespace
    #[error("required field cannot be empty")]
    Empty,
}

/// A form value that is guaranteed to be present.
///
/// The input is trimmed of leading and trailing whitespace; whitespace-only input counts as
/// missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequiredField(String);

impl RequiredField {
    pub fn new(input: impl AsRef<str>) -> Result<Self, FieldError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FieldError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequiredField {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Collects the labels of blank fields, then fails with all of them at once.
fn require_all(fields: &[(&'static str, &str)]) -> RecordResult<()> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(label, _)| *label)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RecordError::MissingInput { fields: missing })
    }
}

// ============================================================================
// INTAKE
// ============================================================================

/// Raw patient intake input as typed at the front desk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntakeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub health_history: String,
    pub insurance_id: String,
}

impl IntakeForm {
    /// Checks that every intake field is present.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingInput`] naming every blank field, in form order.
    pub fn validate(&self) -> RecordResult<()> {
        require_all(&[
            (FIRST_NAME_LABEL, self.first_name.as_str()),
            (LAST_NAME_LABEL, self.last_name.as_str()),
            (EMAIL_LABEL, self.email.as_str()),
            (PHONE_LABEL, self.phone.as_str()),
            (HEALTH_HISTORY_LABEL, self.health_history.as_str()),
            (INSURANCE_ID_LABEL, self.insurance_id.as_str()),
        ])
    }
}

/// Patient profile persisted at intake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntakeRecord {
    pub id: PatientId,
    pub first_name: RequiredField,
    pub last_name: RequiredField,
    pub email: RequiredField,
    pub phone: RequiredField,
    pub health_history: RequiredField,
    pub insurance_id: RequiredField,
    pub exam_date: NaiveDate,
}

impl IntakeRecord {
    /// Builds an intake record from a validated form.
    ///
    /// The exam is scheduled `lead_days` after `created_on`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingInput`] if any field is blank, or
    /// [`RecordError::InvalidInput`] if the exam date overflows the calendar.
    pub fn from_form(
        id: PatientId,
        form: &IntakeForm,
        created_on: NaiveDate,
        lead_days: u32,
    ) -> RecordResult<Self> {
        form.validate()?;

        let exam_date = created_on
            .checked_add_days(Days::new(u64::from(lead_days)))
            .ok_or_else(|| {
                RecordError::InvalidInput(format!(
                    "exam date {lead_days} days after {created_on} is out of range"
                ))
            })?;

        Ok(Self {
            id,
            first_name: RequiredField::new(&form.first_name)?,
            last_name: RequiredField::new(&form.last_name)?,
            email: RequiredField::new(&form.email)?,
            phone: RequiredField::new(&form.phone)?,
            health_history: RequiredField::new(&form.health_history)?,
            insurance_id: RequiredField::new(&form.insurance_id)?,
            exam_date,
        })
    }

    /// Exam date as persisted and displayed (`MM/dd/yyyy`).
    pub fn exam_date_text(&self) -> String {
        self.exam_date.format(EXAM_DATE_FORMAT).to_string()
    }

    pub fn name(&self) -> PatientName {
        PatientName {
            first: self.first_name.as_str().to_owned(),
            last: self.last_name.as_str().to_owned(),
        }
    }
}

/// First and last name as read back from an intake file.
///
/// Either part may be empty when the intake record is absent or lacks the line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatientName {
    pub first: String,
    pub last: String,
}

impl PatientName {
    /// `"first last"`, trimmed, so a missing part leaves no stray space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last).trim().to_string()
    }
}

// ============================================================================
// SCAN
// ============================================================================

/// The six Agatston score lines of a scan record, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    Total,
    Lm,
    Lad,
    Lcx,
    Rca,
    Pda,
}

impl ScoreLabel {
    pub const ALL: [ScoreLabel; 6] = [
        ScoreLabel::Total,
        ScoreLabel::Lm,
        ScoreLabel::Lad,
        ScoreLabel::Lcx,
        ScoreLabel::Rca,
        ScoreLabel::Pda,
    ];

    /// Label used on the persisted line.
    pub fn record_label(self) -> &'static str {
        match self {
            ScoreLabel::Total => TOTAL_SCORE_LABEL,
            ScoreLabel::Lm => LM_SCORE_LABEL,
            ScoreLabel::Lad => LAD_SCORE_LABEL,
            ScoreLabel::Lcx => LCX_SCORE_LABEL,
            ScoreLabel::Rca => RCA_SCORE_LABEL,
            ScoreLabel::Pda => PDA_SCORE_LABEL,
        }
    }

    /// Short label shown on the patient dashboard.
    pub fn display_label(self) -> &'static str {
        match self {
            ScoreLabel::Total => TOTAL_SCORE_LABEL,
            ScoreLabel::Lm => "LM",
            ScoreLabel::Lad => "LAD",
            ScoreLabel::Lcx => "LCX",
            ScoreLabel::Rca => "RCA",
            ScoreLabel::Pda => "PDA",
        }
    }
}

/// Score values read back from a scan file, keyed by label. Absent lines are absent keys.
pub type ScoreMap = BTreeMap<ScoreLabel, String>;

/// Raw technician input for one CT calcium-scoring result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanForm {
    pub identifier: String,
    pub total: String,
    pub lm: String,
    pub lad: String,
    pub lcx: String,
    pub rca: String,
    pub pda: String,
}

impl ScanForm {
    /// Checks that the identifier and all six scores are present.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingInput`] naming every blank field, in form order.
    pub fn validate(&self) -> RecordResult<()> {
        require_all(&[
            (PATIENT_ID_LABEL, self.identifier.as_str()),
            (TOTAL_SCORE_LABEL, self.total.as_str()),
            (LM_SCORE_LABEL, self.lm.as_str()),
            (LAD_SCORE_LABEL, self.lad.as_str()),
            (LCX_SCORE_LABEL, self.lcx.as_str()),
            (RCA_SCORE_LABEL, self.rca.as_str()),
            (PDA_SCORE_LABEL, self.pda.as_str()),
        ])
    }
}

/// Total and per-vessel Agatston scores, kept as entered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VesselScores {
    pub total: RequiredField,
    pub lm: RequiredField,
    pub lad: RequiredField,
    pub lcx: RequiredField,
    pub rca: RequiredField,
    pub pda: RequiredField,
}

impl VesselScores {
    pub fn get(&self, label: ScoreLabel) -> &RequiredField {
        match label {
            ScoreLabel::Total => &self.total,
            ScoreLabel::Lm => &self.lm,
            ScoreLabel::Lad => &self.lad,
            ScoreLabel::Lcx => &self.lcx,
            ScoreLabel::Rca => &self.rca,
            ScoreLabel::Pda => &self.pda,
        }
    }

    /// Scores in canonical line order.
    pub fn iter(&self) -> impl Iterator<Item = (ScoreLabel, &RequiredField)> + '_ {
        ScoreLabel::ALL.into_iter().map(move |label| (label, self.get(label)))
    }

    pub fn to_score_map(&self) -> ScoreMap {
        self.iter()
            .map(|(label, value)| (label, value.as_str().to_owned()))
            .collect()
    }
}

/// Technician-entered scan result.
///
/// `identifier` is whatever the technician typed (trimmed). It is deliberately not a
/// [`PatientId`] and is never checked against existing intake records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanRecord {
    pub identifier: RequiredField,
    pub scores: VesselScores,
}

impl ScanRecord {
    /// Builds a scan record from a validated form.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingInput`] if any field is blank.
    pub fn from_form(form: &ScanForm) -> RecordResult<Self> {
        form.validate()?;

        Ok(Self {
            identifier: RequiredField::new(&form.identifier)?,
            scores: VesselScores {
                total: RequiredField::new(&form.total)?,
                lm: RequiredField::new(&form.lm)?,
                lad: RequiredField::new(&form.lad)?,
                lcx: RequiredField::new(&form.lcx)?,
                rca: RequiredField::new(&form.rca)?,
                pda: RequiredField::new(&form.pda)?,
            },
        })
    }
}
