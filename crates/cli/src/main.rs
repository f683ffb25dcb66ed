use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use prontuario_core::config::{
    exclude_past_from_env_value, upcoming_limit_from_env_value, utc_offset_from_env_value,
};
use prontuario_core::constants::{ENV_EXCLUDE_PAST, ENV_UPCOMING_LIMIT, ENV_UTC_OFFSET};
use prontuario_core::model::PatientBasics;
use prontuario_core::{
    bmi_class, compute_bmi, decode_payload, validate_json, CoreConfig, Record, RecordError,
    RecordKind, RecordStore,
};
use prontuario_schedule::{toggle_completed, EventId, EventTiming, ScheduleFilter, ScheduledEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "prontuario")]
#[command(about = "Prontuário electronic health record CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute BMI from weight and height
    Bmi {
        /// Weight in kilograms
        #[arg(long)]
        weight_kg: f64,
        /// Height in centimetres
        #[arg(long)]
        height_cm: f64,
    },
    /// Validate a form payload without appending it
    Validate {
        /// Record kind (consultation, medication, exam, allergy, surgery, family-history,
        /// attachment, observation)
        kind: String,
        /// JSON payload file
        payload: PathBuf,
    },
    /// Open a new record from a patient JSON file
    NewRecord {
        /// JSON file with the patient basics
        patient: PathBuf,
    },
    /// Validate a payload and append it to a record, printing the new record
    Append {
        /// Record JSON file
        record: PathBuf,
        /// Record kind
        kind: String,
        /// JSON payload file
        payload: PathBuf,
        /// Write the new record back to the record file
        #[arg(long)]
        in_place: bool,
    },
    /// Events on one day, or all events grouped by day
    Day {
        /// JSON file with a list of events
        events: PathBuf,
        /// Day to show (YYYY-MM-DD); all days when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Next events in chronological order
    Upcoming {
        /// JSON file with a list of events
        events: PathBuf,
        /// Reference day (YYYY-MM-DD); defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Maximum number of events
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
        /// Keep events before today
        #[arg(long)]
        include_past: bool,
    },
    /// Days of a month that have events
    Marks {
        /// JSON file with a list of events
        events: PathBuf,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
    /// Flip the completion flag of one event
    Toggle {
        /// JSON file with a list of events
        events: PathBuf,
        /// Event id (numbers are matched as numbers)
        id: String,
    },
}

#[derive(Serialize)]
struct TimedEvent<'a> {
    timing: EventTiming,
    #[serde(flatten)]
    event: &'a ScheduledEvent,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid JSON in {}: {e}", path.display()).into())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_event_id(raw: &str) -> EventId {
    raw.parse::<i64>()
        .map(EventId::Number)
        .unwrap_or_else(|_| EventId::from(raw))
}

fn config_from_env() -> Result<CoreConfig, Box<dyn Error>> {
    Ok(CoreConfig::new(
        utc_offset_from_env_value(std::env::var(ENV_UTC_OFFSET).ok())?,
        upcoming_limit_from_env_value(std::env::var(ENV_UPCOMING_LIMIT).ok())?,
        exclude_past_from_env_value(std::env::var(ENV_EXCLUDE_PAST).ok())?,
    )?)
}

fn append(
    store: &RecordStore,
    record: &Record,
    kind: &str,
    payload: serde_json::Value,
) -> Result<Record, Box<dyn Error>> {
    let kind: RecordKind = kind.parse()?;
    let payload = match decode_payload(kind, payload) {
        Ok(payload) => payload,
        Err(errors) => return Err(RecordError::Invalid { kind, errors }.into()),
    };
    Ok(store.submit(record, payload)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let cfg = config_from_env()?;
    let filter = ScheduleFilter::new(cfg.utc_offset());
    let store = RecordStore::system();

    match cli.command {
        Some(Commands::Bmi {
            weight_kg,
            height_cm,
        }) => match compute_bmi(Some(weight_kg), Some(height_cm)) {
            Some(bmi) => match bmi_class(bmi) {
                Some(class) => println!("BMI: {bmi} ({class:?})"),
                None => println!("BMI: {bmi}"),
            },
            None => eprintln!("Weight and height must both be greater than zero"),
        },
        Some(Commands::Validate { kind, payload }) => {
            let kind: RecordKind = kind.parse()?;
            let result = validate_json(kind, read_json(&payload)?);
            print_json(&result)?;
        }
        Some(Commands::NewRecord { patient }) => {
            let basics: PatientBasics = read_json(&patient)?;
            match store.create(basics) {
                Ok(record) => print_json(&record)?,
                Err(e) => eprintln!("Error creating record: {}", e),
            }
        }
        Some(Commands::Append {
            record: record_path,
            kind,
            payload,
            in_place,
        }) => {
            let record: Record = read_json(&record_path)?;
            match append(&store, &record, &kind, read_json(&payload)?) {
                Ok(next) if in_place => {
                    std::fs::write(&record_path, serde_json::to_string_pretty(&next)?)?;
                    println!("Appended {} to record {}", kind, next.id());
                }
                Ok(next) => print_json(&next)?,
                Err(e) => eprintln!("Error appending {}: {}", kind, e),
            }
        }
        Some(Commands::Day { events, date }) => {
            let events: Vec<ScheduledEvent> = read_json(&events)?;
            match date {
                Some(day) => print_json(&filter.select_for_day(&events, day))?,
                None => print_json(&filter.group_by_day(&events))?,
            }
        }
        Some(Commands::Upcoming {
            events,
            today,
            limit,
            include_past,
        }) => {
            let events: Vec<ScheduledEvent> = read_json(&events)?;
            let today = today.unwrap_or_else(|| filter.today(Utc::now()));
            let limit = match limit {
                Some(limit) => usize::try_from(limit).unwrap_or(0),
                None => cfg.upcoming_limit(),
            };
            let exclude_past = cfg.exclude_past() && !include_past;

            let timed: Vec<TimedEvent<'_>> = filter
                .select_upcoming(&events, today, limit, exclude_past)
                .into_iter()
                .map(|event| TimedEvent {
                    timing: filter.classify(event, today),
                    event,
                })
                .collect();
            print_json(&timed)?;
        }
        Some(Commands::Marks {
            events,
            year,
            month,
        }) => {
            let events: Vec<ScheduledEvent> = read_json(&events)?;
            print_json(&filter.days_with_events(&events, year, month))?;
        }
        Some(Commands::Toggle { events, id }) => {
            let events: Vec<ScheduledEvent> = read_json(&events)?;
            print_json(&toggle_completed(&events, &parse_event_id(&id)))?;
        }
        None => {
            println!("Use 'prontuario --help' for commands");
        }
    }

    Ok(())
}
