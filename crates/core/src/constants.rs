//! Constants used throughout the prontuário core crate.

/// Default number of items shown in the upcoming-events list of the calendar widget.
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// Default local UTC offset, in seconds, used to derive calendar days (Brasília time).
pub const DEFAULT_UTC_OFFSET_SECONDS: i32 = -3 * 3600;

/// Whether the upcoming list drops events before today unless told otherwise.
pub const DEFAULT_EXCLUDE_PAST: bool = true;

/// Number of decimal places kept for body-mass index.
pub const BMI_DECIMALS: i32 = 1;

/// Default listen address for the REST host.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Environment variable naming the local UTC offset (e.g. `-03:00`).
pub const ENV_UTC_OFFSET: &str = "PRONTUARIO_UTC_OFFSET";

/// Environment variable overriding [`DEFAULT_UPCOMING_LIMIT`].
pub const ENV_UPCOMING_LIMIT: &str = "PRONTUARIO_UPCOMING_LIMIT";

/// Environment variable overriding [`DEFAULT_EXCLUDE_PAST`].
pub const ENV_EXCLUDE_PAST: &str = "PRONTUARIO_EXCLUDE_PAST";

/// Environment variable overriding [`DEFAULT_REST_ADDR`].
pub const ENV_REST_ADDR: &str = "PRONTUARIO_REST_ADDR";
