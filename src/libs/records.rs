//! Typed attendance records decoded from the backend's loose JSON.
//!
//! The backend stores check-in data that comes from phones and kiosks, so
//! optional fields are frequently missing, numbers arrive as strings and
//! flags arrive as `0`/`1`. Decoding here is deliberately forgiving: optional
//! fields fall back to their documented defaults, and only a missing identity
//! (`staff`/`employee`), log type or creation timestamp makes a record invalid.
//!
//! Invalid records are reported per record by [`decode_records`], so one bad
//! row never discards a whole refresh.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Timestamp layouts the backend is known to produce.
const DATETIME_FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Error)]
#[error("{doctype} record #{index}: {source}")]
pub struct RecordError {
    pub doctype: &'static str,
    pub index: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Check-in / check-out marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogType {
    In,
    Out,
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogType::In => write!(f, "IN"),
            LogType::Out => write!(f, "OUT"),
        }
    }
}

impl<'de> Deserialize<'de> for LogType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(LogType::In),
            "OUT" => Ok(LogType::Out),
            other => Err(serde::de::Error::custom(format!("unknown logtype '{}'", other))),
        }
    }
}

/// Outcome of the upstream face match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VerificationStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Pending => write!(f, "Pending"),
            VerificationStatus::Success => write!(f, "Success"),
            VerificationStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl<'de> Deserialize<'de> for VerificationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        let status = match raw.as_ref().and_then(Value::as_str).map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "success" => VerificationStatus::Success,
            Some(s) if s == "failed" => VerificationStatus::Failed,
            _ => VerificationStatus::Pending,
        };
        Ok(status)
    }
}

/// One check-in or check-out.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AttendanceLogRecord {
    #[serde(default)]
    pub name: String,
    pub staff: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub staff_name: Option<String>,
    pub logtype: LogType,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub selfie: Option<String>,
    #[serde(deserialize_with = "de_datetime")]
    pub creation: NaiveDateTime,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub face_distance: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub work_hours: Option<f64>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_near_warehouse: bool,
}

impl AttendanceLogRecord {
    /// Display name, falling back to the staff identifier.
    pub fn display_name(&self) -> &str {
        match self.staff_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.staff,
        }
    }
}

/// One employee's working hours for one calendar day.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailyWorkingHoursRecord {
    #[serde(default)]
    pub name: String,
    pub employee: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub employee_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub working_hours: Option<f64>,
    #[serde(default, deserialize_with = "de_linked_logs")]
    pub attendance_log: Vec<String>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub date: Option<NaiveDate>,
}

impl DailyWorkingHoursRecord {
    pub fn display_name(&self) -> &str {
        match self.employee_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.employee,
        }
    }

    /// Working hours with missing or non-finite values counted as zero.
    pub fn hours(&self) -> f64 {
        self.working_hours.filter(|h| h.is_finite()).unwrap_or(0.0)
    }
}

/// Record types that can be decoded from a backend list.
pub trait Record: for<'de> Deserialize<'de> {
    const DOCTYPE: &'static str;
}

impl Record for AttendanceLogRecord {
    const DOCTYPE: &'static str = crate::api::ATTENDANCE_LOG_DOCTYPE;
}

impl Record for DailyWorkingHoursRecord {
    const DOCTYPE: &'static str = crate::api::DAILY_HOURS_DOCTYPE;
}

/// Decodes every raw record, keeping input order.
///
/// Returns the records that decoded plus one [`RecordError`] per record that
/// did not.
pub fn decode_records<R: Record>(raw: Vec<Value>) -> (Vec<R>, Vec<RecordError>) {
    let mut records = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();

    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<R>(value) {
            Ok(record) => records.push(record),
            Err(source) => errors.push(RecordError {
                doctype: R::DOCTYPE,
                index,
                source,
            }),
        }
    }

    (records, errors)
}

/// Parses a backend timestamp in any of the known layouts.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS.iter().find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Parses the serialized list of linked log identifiers.
///
/// Accepts a JSON array (of strings or numbers) or a string containing one.
/// Anything else yields an empty list.
pub fn parse_linked_logs(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ Value::Array(_)) => parse_linked_logs(&parsed),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        _ => false,
    }
}

fn de_opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn de_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(coerce_f64))
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().is_some_and(coerce_flag))
}

fn de_linked_logs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(parse_linked_logs).unwrap_or_default())
}

fn de_datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

fn de_opt_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_flag_variants() {
        assert!(coerce_flag(&json!(true)));
        assert!(coerce_flag(&json!(1)));
        assert!(coerce_flag(&json!("1")));
        assert!(coerce_flag(&json!("Yes")));
        assert!(!coerce_flag(&json!(0)));
        assert!(!coerce_flag(&json!("0")));
        assert!(!coerce_flag(&json!(null)));
    }

    #[test]
    fn test_coerce_f64_rejects_garbage() {
        assert_eq!(coerce_f64(&json!("5.25")), Some(5.25));
        assert_eq!(coerce_f64(&json!(3)), Some(3.0));
        assert_eq!(coerce_f64(&json!("n/a")), None);
        assert_eq!(coerce_f64(&json!([])), None);
    }
}
