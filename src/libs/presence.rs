//! Live presence view: who is in the warehouse right now.
//!
//! Each staff member's current state is their most recent attendance log.
//! The backend is asked for logs newest-first, so the first log seen per
//! staff member is normally the latest one. The builder does not rely on that
//! alone: a later log only replaces the kept one when its creation timestamp
//! is strictly newer. Sorted input therefore behaves as "first seen wins",
//! and unsorted input still ends up with the newest log per person.
//!
//! ## Pipeline
//!
//! 1. Optional staff filter (id or display name, case-insensitive substring)
//! 2. Newest log per staff id, entries ordered by first appearance
//! 3. Join of today's working hours by staff id (missing → 0)
//! 4. Location classification and map link per entry
//! 5. Present/away counters from the final entries
//!
//! ```rust
//! use std::collections::HashMap;
//! use wadash::libs::presence::build_presence_view;
//!
//! let view = build_presence_view(&[], &HashMap::new());
//! assert_eq!(view.present_count + view.away_count, 0);
//! ```

use crate::libs::formatter::{format_hours, format_timestamp};
use crate::libs::geo::{classify, parse_location, LocationIndicator};
use crate::libs::records::{AttendanceLogRecord, DailyWorkingHoursRecord, LogType, VerificationStatus};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// One staff card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffPresenceEntry {
    pub staff_id: String,
    pub display_name: String,
    /// Identifier of the log this entry was built from.
    pub log_id: String,
    pub current_log_type: LogType,
    pub verification_status: VerificationStatus,
    pub formatted_timestamp: String,
    /// Session length, only for check-outs that recorded one.
    pub formatted_work_hours: Option<String>,
    /// Today's total from the daily working-hours join.
    pub daily_hours: f64,
    pub formatted_daily_hours: String,
    pub location_indicator: LocationIndicator,
    pub map_link: Option<String>,
    pub selfie: Option<String>,
}

impl StaffPresenceEntry {
    pub fn is_present(&self) -> bool {
        self.current_log_type == LogType::In
    }
}

/// The whole presence page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresenceView {
    pub entries: Vec<StaffPresenceEntry>,
    pub present_count: usize,
    pub away_count: usize,
}

/// Builds the presence view using today's local date for timestamps.
pub fn build_presence_view(logs: &[AttendanceLogRecord], hours_by_employee: &HashMap<String, f64>) -> PresenceView {
    PresenceBuilder::new(Local::now().date_naive()).build(logs, hours_by_employee)
}

/// Indexes daily working-hours records by employee id.
///
/// When an employee appears more than once the hours are summed.
pub fn hours_by_employee(records: &[DailyWorkingHoursRecord]) -> HashMap<String, f64> {
    let mut hours: HashMap<String, f64> = HashMap::new();
    for record in records {
        *hours.entry(record.employee.clone()).or_insert(0.0) += record.hours();
    }
    hours
}

/// Presence view builder with an explicit reference date and optional filter.
#[derive(Debug, Clone)]
pub struct PresenceBuilder {
    today: NaiveDate,
    staff_filter: Option<String>,
}

impl PresenceBuilder {
    pub fn new(today: NaiveDate) -> Self {
        Self { today, staff_filter: None }
    }

    /// Keeps only staff whose id or display name contains `filter`.
    ///
    /// Blank filters are ignored.
    pub fn staff_filter(mut self, filter: Option<&str>) -> Self {
        self.staff_filter = filter.map(|f| f.trim().to_lowercase()).filter(|f| !f.is_empty());
        self
    }

    pub fn build(&self, logs: &[AttendanceLogRecord], hours_by_employee: &HashMap<String, f64>) -> PresenceView {
        let mut order: Vec<&str> = Vec::new();
        let mut latest: HashMap<&str, &AttendanceLogRecord> = HashMap::new();

        for log in logs.iter().filter(|log| self.matches(log)) {
            match latest.get(log.staff.as_str()).map(|kept| kept.creation) {
                None => {
                    order.push(&log.staff);
                    latest.insert(&log.staff, log);
                }
                Some(kept_creation) if log.creation > kept_creation => {
                    tracing::debug!(staff = %log.staff, "newer log found after an older one, input was not sorted");
                    latest.insert(&log.staff, log);
                }
                Some(_) => {}
            }
        }

        let entries: Vec<StaffPresenceEntry> = order
            .iter()
            .filter_map(|staff| latest.get(staff))
            .map(|log| self.entry(log, hours_by_employee))
            .collect();

        let present_count = entries.iter().filter(|e| e.is_present()).count();
        let away_count = entries.len() - present_count;

        PresenceView {
            entries,
            present_count,
            away_count,
        }
    }

    fn matches(&self, log: &AttendanceLogRecord) -> bool {
        match &self.staff_filter {
            None => true,
            Some(filter) => log.staff.to_lowercase().contains(filter) || log.display_name().to_lowercase().contains(filter),
        }
    }

    fn entry(&self, log: &AttendanceLogRecord, hours_by_employee: &HashMap<String, f64>) -> StaffPresenceEntry {
        let coordinates = log.location.as_ref().and_then(parse_location);
        let daily_hours = hours_by_employee.get(&log.staff).copied().unwrap_or(0.0);

        let formatted_work_hours = match log.logtype {
            LogType::Out => log.work_hours.map(|h| format_hours(Some(h))),
            LogType::In => None,
        };

        StaffPresenceEntry {
            staff_id: log.staff.clone(),
            display_name: log.display_name().to_string(),
            log_id: log.name.clone(),
            current_log_type: log.logtype,
            verification_status: log.verification_status,
            formatted_timestamp: format_timestamp(&log.creation, self.today),
            formatted_work_hours,
            daily_hours,
            formatted_daily_hours: format_hours(Some(daily_hours)),
            location_indicator: classify(coordinates.as_ref(), log.is_near_warehouse),
            map_link: coordinates.map(|c| c.map_link()),
            selfie: log.selfie.clone(),
        }
    }
}
