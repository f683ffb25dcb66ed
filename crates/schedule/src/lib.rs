//! # Prontuário Schedule
//!
//! Selection and ordering of dated events for the calendar widget.
//!
//! Events arrive as a flat list owned by the caller, with dates as raw strings. All date parsing
//! goes through [`normalize_date_time`], so every view agrees on which events are malformed;
//! malformed events are left out of every view rather than reported as errors.

mod date;
mod event;
mod filter;

pub use date::{normalize_date, normalize_date_time, CalendarDate};
pub use event::{EventId, ScheduledEvent};
pub use filter::{toggle_completed, EventTiming, ScheduleFilter};
