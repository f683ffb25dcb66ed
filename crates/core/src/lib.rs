//! # Prontuário Core
//!
//! Core business logic for the prontuário (electronic health record) aggregate.
//!
//! This crate contains the record model and the operations over it:
//! - [`validation`]: per-form rule sets, collecting every field error in one pass
//! - [`metrics`]: derived clinical values such as BMI
//! - [`store`]: the immutable-update API that appends validated entries to a [`Record`]
//!
//! **No API concerns**: HTTP servers and command-line handling belong in `api-rest` and `cli`.
//! Nothing here persists records; a record is a value that callers keep wherever they like.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod model;
pub mod store;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use error::{ConfigError, ConfigResult, RecordError, ShapeError, UnknownKind};
pub use metrics::{age_on, bmi_class, compute_bmi, BmiClass};
pub use model::{Entry, Payload, Record, RecordKind};
pub use store::RecordStore;
pub use validation::{
    decode_payload, validate, validate_form, validate_json, FieldErrors, FormRules,
    ValidationResult,
};

pub use prontuario_types::{DiagnosticCode, NonEmptyText, TextError};
pub use prontuario_uuid::EntryId;
