//! Flat `Label: value` text format for intake and scan files.
//!
//! This module owns the canonical line order of each record kind and is the only place that
//! renders or parses record text. It does no I/O.
//!
//! Format:
//! - one `Label: value` pair per line, lines joined with `\n`, no trailing newline
//! - intake files carry 8 lines, scan files 7, in the order of [`INTAKE_LABELS`] and
//!   [`SCAN_LABELS`]
//! - on read, a line belongs to a label when it starts with `Label:`; the value is the rest of
//!   the line, trimmed
//!
//! ## Unescaped free text
//!
//! Values are written verbatim. A value containing a line break (typically health history)
//! splits into extra lines, and a continuation line that happens to start with a known label
//! is read back as that label. See [`UNESCAPED_FREE_TEXT`] and [`breaks_line_format`].

use crate::constants::{
    EMAIL_LABEL, EXAM_DATE_LABEL, FIRST_NAME_LABEL, HEALTH_HISTORY_LABEL, INSURANCE_ID_LABEL,
    LAST_NAME_LABEL, LINE_TERMINATOR, PATIENT_ID_LABEL, PHONE_LABEL,
};
use crate::records::{IntakeRecord, PatientName, ScanRecord, ScoreLabel, ScoreMap};

/// Known limitation: free-text values are not escaped.
pub const UNESCAPED_FREE_TEXT: &str =
    "record values are written verbatim; embedded line breaks corrupt read-back";

/// Intake line labels in canonical order.
pub const INTAKE_LABELS: [&str; 8] = [
    PATIENT_ID_LABEL,
    FIRST_NAME_LABEL,
    LAST_NAME_LABEL,
    EMAIL_LABEL,
    PHONE_LABEL,
    HEALTH_HISTORY_LABEL,
    INSURANCE_ID_LABEL,
    EXAM_DATE_LABEL,
];

/// Scan line labels in canonical order.
pub const SCAN_LABELS: [&str; 7] = [
    PATIENT_ID_LABEL,
    crate::constants::TOTAL_SCORE_LABEL,
    crate::constants::LM_SCORE_LABEL,
    crate::constants::LAD_SCORE_LABEL,
    crate::constants::LCX_SCORE_LABEL,
    crate::constants::RCA_SCORE_LABEL,
    crate::constants::PDA_SCORE_LABEL,
];

/// Returns true if writing `value` on a single line would not survive read-back.
pub fn breaks_line_format(value: &str) -> bool {
    value.contains(['\n', '\r'])
}

fn render_lines<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join(LINE_TERMINATOR)
}

/// Value of `line` if it carries `label`, i.e. starts with `label:`.
fn labelled_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.strip_prefix(label)?.strip_prefix(':').map(str::trim)
}

/// Intake file text operations.
pub struct IntakeText;

impl IntakeText {
    /// Renders the 8 intake lines.
    pub fn render(record: &IntakeRecord) -> String {
        let id = record.id.to_string();
        let exam_date = record.exam_date_text();
        let values = [
            id.as_str(),
            record.first_name.as_str(),
            record.last_name.as_str(),
            record.email.as_str(),
            record.phone.as_str(),
            record.health_history.as_str(),
            record.insurance_id.as_str(),
            exam_date.as_str(),
        ];
        render_lines(INTAKE_LABELS.into_iter().zip(values))
    }

    /// Labels of intake values that would break the line format if written.
    pub fn unescaped_fields(record: &IntakeRecord) -> Vec<&'static str> {
        [
            (FIRST_NAME_LABEL, record.first_name.as_str()),
            (LAST_NAME_LABEL, record.last_name.as_str()),
            (EMAIL_LABEL, record.email.as_str()),
            (PHONE_LABEL, record.phone.as_str()),
            (HEALTH_HISTORY_LABEL, record.health_history.as_str()),
            (INSURANCE_ID_LABEL, record.insurance_id.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| breaks_line_format(value))
        .map(|(label, _)| label)
        .collect()
    }

    /// Extracts first and last name from intake text.
    ///
    /// The first line (the identifier) is skipped. Missing lines leave the part empty; if a
    /// label repeats, the last occurrence wins.
    pub fn parse_name(text: &str) -> PatientName {
        let mut name = PatientName::default();

        for line in text.lines().skip(1) {
            if let Some(value) = labelled_value(line, FIRST_NAME_LABEL) {
                name.first = value.to_owned();
            } else if let Some(value) = labelled_value(line, LAST_NAME_LABEL) {
                name.last = value.to_owned();
            }
        }

        name
    }
}

/// Scan file text operations.
pub struct ScanText;

impl ScanText {
    /// Renders the 7 scan lines.
    pub fn render(record: &ScanRecord) -> String {
        let pairs = std::iter::once((PATIENT_ID_LABEL, record.identifier.as_str())).chain(
            record
                .scores
                .iter()
                .map(|(label, value)| (label.record_label(), value.as_str())),
        );
        render_lines(pairs)
    }

    /// Labels of scan values that would break the line format if written.
    pub fn unescaped_fields(record: &ScanRecord) -> Vec<&'static str> {
        std::iter::once((PATIENT_ID_LABEL, record.identifier.as_str()))
            .chain(
                record
                    .scores
                    .iter()
                    .map(|(label, value)| (label.record_label(), value.as_str())),
            )
            .filter(|(_, value)| breaks_line_format(value))
            .map(|(label, _)| label)
            .collect()
    }

    /// Extracts the six score lines from scan text. Lines that carry no score label are
    /// ignored; absent scores are absent keys.
    pub fn parse_scores(text: &str) -> ScoreMap {
        let mut scores = ScoreMap::new();

        for line in text.lines() {
            let found = ScoreLabel::ALL.into_iter().find_map(|label| {
                labelled_value(line, label.record_label()).map(|value| (label, value))
            });
            if let Some((label, value)) = found {
                scores.insert(label, value.to_owned());
            }
        }

        scores
    }
}
