//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services as
//! `Arc<CoreConfig>`. Nothing in the core reads environment variables while handling a
//! request; binaries read them and hand the raw values to the `*_from_env_value` helpers.

use crate::constants::{DEFAULT_EXCLUDE_PAST, DEFAULT_UPCOMING_LIMIT, DEFAULT_UTC_OFFSET_SECONDS};
use crate::error::{ConfigError, ConfigResult};
use chrono::{FixedOffset, Offset, Utc};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    utc_offset: FixedOffset,
    upcoming_limit: usize,
    exclude_past: bool,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidInput` if `upcoming_limit` is zero, since an upcoming list
    /// that can never show anything is always a misconfiguration.
    pub fn new(
        utc_offset: FixedOffset,
        upcoming_limit: usize,
        exclude_past: bool,
    ) -> ConfigResult<Self> {
        if upcoming_limit == 0 {
            return Err(ConfigError::InvalidInput(
                "upcoming_limit must be greater than zero".into(),
            ));
        }

        Ok(Self {
            utc_offset,
            upcoming_limit,
            exclude_past,
        })
    }

    /// Build a configuration from optional raw environment values.
    pub fn from_env_values(
        utc_offset: Option<String>,
        upcoming_limit: Option<String>,
        exclude_past: Option<String>,
    ) -> ConfigResult<Self> {
        Self::new(
            utc_offset_from_env_value(utc_offset)?,
            upcoming_limit_from_env_value(upcoming_limit)?,
            exclude_past_from_env_value(exclude_past)?,
        )
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    pub fn upcoming_limit(&self) -> usize {
        self.upcoming_limit
    }

    pub fn exclude_past(&self) -> bool {
        self.exclude_past
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
            exclude_past: DEFAULT_EXCLUDE_PAST,
        }
    }
}

fn default_utc_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECONDS).unwrap_or(Utc.fix())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a UTC offset such as `-03:00`, `+0530`, `Z` or `UTC`.
///
/// If `value` is `None` or empty/whitespace, returns the default offset.
pub fn utc_offset_from_env_value(value: Option<String>) -> ConfigResult<FixedOffset> {
    let Some(value) = trimmed(value) else {
        return Ok(default_utc_offset());
    };

    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let invalid = || ConfigError::InvalidInput(format!("invalid UTC offset '{}'", value));

    let (sign, rest) = match value.as_bytes().first() {
        Some(b'+') => (1, &value[1..]),
        Some(b'-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[0..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..4].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Parse the default upcoming-list limit.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_UPCOMING_LIMIT`].
pub fn upcoming_limit_from_env_value(value: Option<String>) -> ConfigResult<usize> {
    match trimmed(value) {
        None => Ok(DEFAULT_UPCOMING_LIMIT),
        Some(v) => v.parse::<usize>().map_err(|_| {
            ConfigError::InvalidInput(format!("upcoming limit must be a positive integer, got '{}'", v))
        }),
    }
}

/// Parse the exclude-past flag (`true`/`false`/`1`/`0`/`yes`/`no`).
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_EXCLUDE_PAST`].
pub fn exclude_past_from_env_value(value: Option<String>) -> ConfigResult<bool> {
    match trimmed(value).map(|v| v.to_ascii_lowercase()) {
        None => Ok(DEFAULT_EXCLUDE_PAST),
        Some(v) => match v.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidInput(format!(
                "exclude-past flag must be true or false, got '{}'",
                v
            ))),
        },
    }
}
