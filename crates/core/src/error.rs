use crate::model::RecordKind;
use crate::validation::FieldErrors;

/// A payload reached the record store without one of its identifying fields.
///
/// This is a programmer error: it cannot happen for payloads that passed validation first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{subject} payload is missing its identifying field '{field}'")]
pub struct ShapeError {
    /// What was being appended (`patient`, `contact` or a record kind).
    pub subject: &'static str,
    /// Wire name of the missing field.
    pub field: &'static str,
}

impl ShapeError {
    pub(crate) fn new(subject: &'static str, field: &'static str) -> Self {
        Self { subject, field }
    }
}

/// Errors returned when a payload goes through the full validate-and-append path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("{kind} payload failed validation: {errors}")]
    Invalid { kind: RecordKind, errors: FieldErrors },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown record kind: '{0}'")]
pub struct UnknownKind(pub String);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidInput(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
