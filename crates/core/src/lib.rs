//! # Heart Core
//!
//! Core logic for the heart health imaging clinic: patient intake, technician capture of CT
//! calcium-scoring results, and patient self-service lookup.
//!
//! This crate contains pure record operations and the navigation state machine:
//! - 5-digit patient identifier issuance ([`identifier`])
//! - flat `Label: value` record files under a configured directory ([`store`], [`text`])
//! - presence checks that gate patient login ([`validation`])
//! - the [`SessionController`] that selects the active view and runs each workflow
//!
//! **No presentation concerns**: layout, dialogs and windows belong to whatever renders a
//! [`Transition`].

pub mod config;
pub mod constants;
pub mod error;
pub mod identifier;
pub mod paths;
pub mod records;
pub mod session;
pub mod store;
pub mod text;
pub mod validation;

pub use config::CoreConfig;
pub use error::{RecordError, RecordResult};
pub use identifier::{
    FixedIdentifierGenerator, IdentifierGenerator, PatientId, RandomIdentifierGenerator,
};
pub use records::{
    IntakeForm, IntakeRecord, PatientName, RecordKind, ScanForm, ScanRecord, ScoreLabel, ScoreMap,
};
pub use session::{
    Condition, Dashboard, IntakeConfirmation, Outcome, ScanConfirmation, SessionController,
    SessionEvent, SessionState, Transition, View,
};
pub use store::RecordStore;
pub use validation::Validator;
