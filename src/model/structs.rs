use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{ErrorKind, Result};

/// Opaque registrant identifier. The server stores user ids, but the page may
/// hand them over as strings, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentId::Number(n) => write!(f, "{n}"),
            StudentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StudentId {
    fn from(n: i64) -> Self {
        StudentId::Number(n)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) => StudentId::Number(n),
            Err(_) => StudentId::Text(s.to_string()),
        }
    }
}

/// Free places over venue capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub free_places: u32,
    pub capacity: u32,
}

impl Counter {
    pub fn new(free_places: i64, capacity: i64) -> Result<Self> {
        if capacity < 0 || free_places < 0 {
            return Err(ErrorKind::Schema(format!(
                "negative counter {free_places} / {capacity}"
            ))
            .into());
        }
        if free_places > capacity {
            return Err(ErrorKind::Schema(format!(
                "free places {free_places} exceed capacity {capacity}"
            ))
            .into());
        }
        let narrow = |n: i64| {
            u32::try_from(n).map_err(|_| ErrorKind::Schema(format!("counter {n} out of range")))
        };
        Ok(Self {
            free_places: narrow(free_places)?,
            capacity: narrow(capacity)?,
        })
    }

    fn from_parts(free_places: Option<i64>, capacity: Option<i64>) -> Result<Option<Self>> {
        match (free_places, capacity) {
            (Some(free), Some(cap)) => Counter::new(free, cap).map(Some),
            _ => Ok(None),
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.free_places, self.capacity)
    }
}

/// Full registration state as reported by the refresh handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationView {
    pub registration_status: String,
    pub button_text: String,
    pub free_places: u32,
    pub capacity: u32,
}

impl RegistrationView {
    pub fn counter(&self) -> Counter {
        Counter {
            free_places: self.free_places,
            capacity: self.capacity,
        }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawView = decode(value)?;
        let counter = Counter::new(raw.free_places, raw.capacity)?;
        Ok(Self {
            registration_status: raw.registration_status,
            button_text: raw.button_text,
            free_places: counter.free_places,
            capacity: counter.capacity,
        })
    }
}

#[derive(Deserialize)]
struct RawView {
    registration_status: String,
    button_text: String,
    free_places: i64,
    capacity: i64,
}

/// Register handler response. Older servers only send the status/label pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub registration_status: String,
    pub button_text: String,
    pub counter: Option<Counter>,
}

impl StatusUpdate {
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawStatus = decode(value)?;
        Ok(Self {
            registration_status: raw.registration_status,
            button_text: raw.button_text,
            counter: Counter::from_parts(raw.free_places, raw.capacity)?,
        })
    }
}

#[derive(Deserialize)]
struct RawStatus {
    registration_status: String,
    button_text: String,
    #[serde(default)]
    free_places: Option<i64>,
    #[serde(default)]
    capacity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalUpdate {
    pub button_text: String,
    pub student_id: Option<StudentId>,
    pub counter: Option<Counter>,
}

impl ApprovalUpdate {
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawApproval = decode(value)?;
        Ok(Self {
            button_text: raw.button_text,
            student_id: raw.student_id,
            counter: Counter::from_parts(raw.free_places, raw.capacity)?,
        })
    }
}

#[derive(Deserialize)]
struct RawApproval {
    button_text: String,
    #[serde(default)]
    student_id: Option<StudentId>,
    #[serde(default)]
    free_places: Option<i64>,
    #[serde(default)]
    capacity: Option<i64>,
}

/// Checks the mail handler acknowledgment. The handler answers `null` to
/// non-staff callers and `{"status": "fail"}` when subject or text is missing.
pub fn check_mail_ack(value: &Value) -> Result<()> {
    match value {
        Value::Null => Err(ErrorKind::Rejected("only course staff can send mail".to_string()).into()),
        Value::Object(map) => match map.get("status").and_then(Value::as_str) {
            Some("ok") | None => Ok(()),
            Some("fail") => Err(ErrorKind::Rejected("subject and text are required".to_string()).into()),
            Some(other) => Err(ErrorKind::Schema(format!("unknown mail status {other:?}")).into()),
        },
        other => Err(ErrorKind::Schema(format!("unexpected mail acknowledgment {other}")).into()),
    }
}

fn decode<T: for<'de> Deserialize<'de>>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ErrorKind::Schema(e.to_string()).into())
}
