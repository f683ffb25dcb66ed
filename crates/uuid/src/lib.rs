//! Canonical identifiers for records and their entries.
//!
//! Every record and every appended entry carries an identifier in one canonical textual form:
//! **32 lowercase hexadecimal characters** (no hyphens), which is what
//! `Uuid::new_v4().simple().to_string()` produces.
//!
//! Canonical form is *required* for externally supplied identifiers (REST paths, CLI input).
//! Use [`EntryId::parse`] to validate them. Non-canonical values (uppercase, hyphenated, wrong
//! length, non-hex) are rejected rather than normalised, so one entry never has two spellings.

mod service;

pub use service::{EntryId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
