use serde::{Deserialize, Serialize};
use std::fmt;

/// Event identifier as supplied by the caller: either a number or a string.
///
/// `1` and `"1"` are different identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
}

impl From<i64> for EventId {
    fn from(value: i64) -> Self {
        EventId::Number(value)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        EventId::Text(value.to_string())
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        EventId::Text(value)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(n) => write!(f, "{n}"),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

/// An appointment or task shown on the calendar.
///
/// `date` is kept exactly as supplied; it is only interpreted when a view is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEvent {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ScheduledEvent {
    pub fn new(id: impl Into<EventId>, title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            location: None,
            category: None,
            completed: None,
            color: None,
            icon: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_keep_their_json_type() {
        let events: Vec<ScheduledEvent> = serde_json::from_str(
            r#"[{"id": 1, "title": "Retorno", "date": "2024-03-10"},
                {"id": "a7", "date": "2024-03-11T09:30"}]"#,
        )
        .unwrap();

        assert_eq!(events[0].id, EventId::Number(1));
        assert_eq!(events[1].id, EventId::Text("a7".into()));
        assert_ne!(EventId::from(1), EventId::from("1"));
        assert_eq!(events[1].title, "");

        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["id"], 1);
        assert!(json.get("completed").is_none());
    }
}
