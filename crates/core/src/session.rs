//! Navigation state machine for the clinic workflows.
//!
//! [`SessionController`] owns the active view and is the only component that combines the
//! identifier generator, the record store and the validator. A presentation layer feeds it one
//! [`SessionEvent`] at a time and renders the returned [`Transition`]; it never touches records
//! directly.
//!
//! ```text
//!              OpenIntake            SaveIntake ok / Back
//!   MainMenu ───────────────> Intake ─────────────────────> MainMenu
//!   MainMenu ───────────────> TechCapture ──(SaveScan ok / Back)──> MainMenu
//!   MainMenu ───────────────> Login ──Back──> MainMenu
//!                             Login ──Login ok──> PatientDashboard ──Logout──> MainMenu
//! ```
//!
//! Rejected saves and failed logins leave the state unchanged and carry a [`Condition`].
//! Events with no edge from the current view are ignored with
//! [`Condition::EventNotAllowed`].

use crate::config::CoreConfig;
use crate::identifier::{IdentifierGenerator, PatientId, RandomIdentifierGenerator};
use crate::records::{
    IntakeForm, IntakeRecord, PatientName, ScanForm, ScanRecord, ScoreLabel, ScoreMap,
};
use crate::store::RecordStore;
use crate::validation::Validator;
use crate::RecordError;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

// ============================================================================
// STATES AND EVENTS
// ============================================================================

/// Data-less name of a session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    MainMenu,
    Intake,
    TechCapture,
    Login,
    PatientDashboard,
}

/// The active workflow. The dashboard carries what it displays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum SessionState {
    MainMenu,
    Intake,
    TechCapture,
    Login,
    PatientDashboard(Dashboard),
}

impl SessionState {
    pub fn view(&self) -> View {
        match self {
            SessionState::MainMenu => View::MainMenu,
            SessionState::Intake => View::Intake,
            SessionState::TechCapture => View::TechCapture,
            SessionState::Login => View::Login,
            SessionState::PatientDashboard(_) => View::PatientDashboard,
        }
    }
}

/// A single external input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    OpenIntake,
    OpenTechCapture,
    OpenLogin,
    /// Cancel out of intake, technician capture or login.
    Back,
    SaveIntake(IntakeForm),
    SaveScan(ScanForm),
    Login { identifier: String },
    Logout,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::OpenIntake => "open_intake",
            SessionEvent::OpenTechCapture => "open_tech_capture",
            SessionEvent::OpenLogin => "open_login",
            SessionEvent::Back => "back",
            SessionEvent::SaveIntake(_) => "save_intake",
            SessionEvent::SaveScan(_) => "save_scan",
            SessionEvent::Login { .. } => "login",
            SessionEvent::Logout => "logout",
        }
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Patient-facing results view, read back from both records at login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub identifier: String,
    pub patient_name: PatientName,
    pub scores: ScoreMap,
}

impl Dashboard {
    /// `Hello <Jane Doe>`
    pub fn title(&self) -> String {
        format!("Hello <{}>", self.patient_name.full_name())
    }

    /// Score text for `label`, empty if the scan file lacked the line.
    pub fn score(&self, label: ScoreLabel) -> &str {
        self.scores.get(&label).map(String::as_str).unwrap_or("")
    }

    /// Display lines in canonical order, e.g. `LM: 10`.
    pub fn score_lines(&self) -> Vec<String> {
        ScoreLabel::ALL
            .into_iter()
            .map(|label| format!("{}: {}", label.display_label(), self.score(label)))
            .collect()
    }
}

/// What the front desk shows after a successful intake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntakeConfirmation {
    pub patient_id: PatientId,
    pub patient_name: String,
    pub exam_date: String,
    pub contact_number: String,
}

impl IntakeConfirmation {
    pub fn message(&self) -> String {
        format!(
            "Patient Name: {}\nPatient ID: {}\nExam Date: {}\nContact Number: {}",
            self.patient_name, self.patient_id, self.exam_date, self.contact_number
        )
    }
}

/// What the technician sees after a successful scan save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScanConfirmation {
    pub identifier: String,
}

impl ScanConfirmation {
    pub fn message(&self) -> &'static str {
        "CT Report has been saved successfully!"
    }
}

/// User-visible reason an event was refused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum Condition {
    #[error("Missing Information! Please fill in all the required text field!")]
    MissingInformation { fields: Vec<&'static str> },
    #[error("Please enter your patient ID!")]
    EmptyIdentifier,
    #[error("Wrong patient ID entered. Please confirm your patient ID!")]
    InvalidIdentifier { identifier: String },
    #[error("Patient ID: {identifier}. Report unavailable!")]
    ReportUnavailable { identifier: String },
    #[error("record could not be built: {reason}")]
    RecordRejected { reason: String },
    #[error("'{event}' is not available from {state:?}")]
    EventNotAllowed { state: View, event: &'static str },
}

impl Condition {
    /// Short heading for an alert.
    pub fn title(&self) -> &'static str {
        match self {
            Condition::EmptyIdentifier | Condition::InvalidIdentifier { .. } => "Login Error",
            Condition::ReportUnavailable { .. } => "Report Error",
            Condition::MissingInformation { .. }
            | Condition::RecordRejected { .. }
            | Condition::EventNotAllowed { .. } => "Error",
        }
    }
}

impl From<RecordError> for Condition {
    fn from(error: RecordError) -> Self {
        match error {
            RecordError::MissingInput { fields } => Condition::MissingInformation { fields },
            other => Condition::RecordRejected {
                reason: other.to_string(),
            },
        }
    }
}

/// Result attached to a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    IntakeSaved(IntakeConfirmation),
    ScanSaved(ScanConfirmation),
    Rejected(Condition),
}

/// Result of handling one event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: View,
    pub state: SessionState,
    pub outcome: Option<Outcome>,
}

impl Transition {
    pub fn condition(&self) -> Option<&Condition> {
        match &self.outcome {
            Some(Outcome::Rejected(condition)) => Some(condition),
            _ => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.condition().is_some()
    }
}

type Step = (Option<SessionState>, Option<Outcome>);

fn stay_with(condition: Condition) -> Step {
    (None, Some(Outcome::Rejected(condition)))
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// Owns the session state and runs every workflow transition synchronously.
pub struct SessionController {
    cfg: Arc<CoreConfig>,
    store: RecordStore,
    validator: Validator,
    generator: Box<dyn IdentifierGenerator>,
    today: Box<dyn Fn() -> NaiveDate>,
    state: SessionState,
}

impl SessionController {
    /// Creates a controller in [`SessionState::MainMenu`] with random identifiers and the local
    /// calendar date.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            store: RecordStore::new(cfg.clone()),
            validator: Validator::new(cfg.clone()),
            cfg,
            generator: Box::new(RandomIdentifierGenerator::new()),
            today: Box::new(local_today),
            state: SessionState::MainMenu,
        }
    }

    /// Replaces the identifier source used at intake.
    pub fn with_generator(mut self, generator: impl IdentifierGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// Replaces the clock used to schedule exams.
    pub fn with_today(mut self, today: impl Fn() -> NaiveDate + 'static) -> Self {
        self.today = Box::new(today);
        self
    }

    pub fn current_state(&self) -> &SessionState {
        &self.state
    }

    /// Applies one event and reports the resulting state.
    pub fn handle(&mut self, event: SessionEvent) -> Transition {
        let from = self.state.view();
        let event_name = event.name();

        let (next, outcome) = match (from, event) {
            (View::MainMenu, SessionEvent::OpenIntake) => (Some(SessionState::Intake), None),
            (View::MainMenu, SessionEvent::OpenTechCapture) => {
                (Some(SessionState::TechCapture), None)
            }
            (View::MainMenu, SessionEvent::OpenLogin) => (Some(SessionState::Login), None),
            (View::Intake | View::TechCapture | View::Login, SessionEvent::Back) => {
                (Some(SessionState::MainMenu), None)
            }
            (View::Intake, SessionEvent::SaveIntake(form)) => self.save_intake(&form),
            (View::TechCapture, SessionEvent::SaveScan(form)) => self.save_scan(&form),
            (View::Login, SessionEvent::Login { identifier }) => self.login(&identifier),
            (View::PatientDashboard, SessionEvent::Logout) => (Some(SessionState::MainMenu), None),
            (state, _) => stay_with(Condition::EventNotAllowed {
                state,
                event: event_name,
            }),
        };

        if let Some(next) = next {
            self.state = next;
        }

        let to = self.state.view();
        match outcome.as_ref() {
            Some(Outcome::Rejected(condition)) => {
                tracing::debug!(?from, event = event_name, %condition, "session event rejected")
            }
            _ => tracing::debug!(?from, ?to, event = event_name, "session transition"),
        }

        Transition {
            from,
            state: self.state.clone(),
            outcome,
        }
    }

    fn save_intake(&mut self, form: &IntakeForm) -> Step {
        // Validate before drawing an identifier so refused saves leave no trace.
        if let Err(e) = form.validate() {
            return stay_with(e.into());
        }

        let id = self.generator.generate();
        let record =
            match IntakeRecord::from_form(id, form, (self.today)(), self.cfg.exam_lead_days()) {
                Ok(record) => record,
                Err(e) => return stay_with(e.into()),
            };

        self.store.write_intake(&record);

        let confirmation = IntakeConfirmation {
            patient_id: record.id,
            patient_name: record.name().full_name(),
            exam_date: record.exam_date_text(),
            contact_number: record.phone.as_str().to_owned(),
        };
        (
            Some(SessionState::MainMenu),
            Some(Outcome::IntakeSaved(confirmation)),
        )
    }

    fn save_scan(&mut self, form: &ScanForm) -> Step {
        let record = match ScanRecord::from_form(form) {
            Ok(record) => record,
            Err(e) => return stay_with(e.into()),
        };

        self.store.write_scan(&record);

        let confirmation = ScanConfirmation {
            identifier: record.identifier.as_str().to_owned(),
        };
        (
            Some(SessionState::MainMenu),
            Some(Outcome::ScanSaved(confirmation)),
        )
    }

    /// Checks run in order and the first failure decides the condition.
    fn login(&mut self, identifier: &str) -> Step {
        let identifier = identifier.trim();

        if identifier.is_empty() {
            return stay_with(Condition::EmptyIdentifier);
        }

        if !self.validator.intake_exists(identifier) {
            return stay_with(Condition::InvalidIdentifier {
                identifier: identifier.to_owned(),
            });
        }

        if !self.validator.scan_exists(identifier) {
            return stay_with(Condition::ReportUnavailable {
                identifier: identifier.to_owned(),
            });
        }

        let dashboard = Dashboard {
            identifier: identifier.to_owned(),
            patient_name: self.store.read_intake_name(identifier),
            scores: self.store.read_scan(identifier),
        };
        (Some(SessionState::PatientDashboard(dashboard)), None)
    }
}
