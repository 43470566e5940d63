//! One refresh cycle of the dashboard: fetch, decode, build.
//!
//! [`Dashboard`] owns the record source and turns fresh records into view
//! models. It keeps no state between cycles; every call rebuilds its view
//! from what the source returns.
//!
//! ## Failure Handling
//!
//! - Attendance logs cannot be fetched → the cycle fails, callers keep the previous view
//! - Daily hours cannot be fetched → warning, join treated as empty, no analytics in the snapshot
//! - Individual malformed records → skipped with a warning

use crate::api::{ApiError, FilterOp, ListQuery, RecordSource, ATTENDANCE_LOG_DOCTYPE, DAILY_HOURS_DOCTYPE};
use crate::libs::analytics::{build_analytics_view_ordered, AnalyticsView, RowOrder};
use crate::libs::config::DashboardConfig;
use crate::libs::messages::Message;
use crate::libs::presence::{hours_by_employee, PresenceBuilder, PresenceView};
use crate::libs::records::{decode_records, AttendanceLogRecord, DailyWorkingHoursRecord, Record};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

const LOG_FIELDS: [&str; 11] = [
    "name",
    "staff",
    "staff_name",
    "logtype",
    "selfie",
    "creation",
    "verification_status",
    "face_distance",
    "work_hours",
    "location",
    "is_near_warehouse",
];

const HOURS_FIELDS: [&str; 6] = ["name", "employee", "employee_name", "working_hours", "attendance_log", "date"];

/// User-selectable narrowing of the views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewFilter {
    /// Substring of a staff id or name.
    pub staff: Option<String>,
    /// Day to report on; today when absent.
    pub date: Option<NaiveDate>,
}

impl ViewFilter {
    pub fn date_or_today(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Everything one refresh produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Sequence number of the refresh request; 0 for one-off refreshes.
    pub generation: u64,
    pub refreshed_at: NaiveDateTime,
    pub filter: ViewFilter,
    pub presence: PresenceView,
    pub analytics: Option<AnalyticsView>,
}

pub struct Dashboard<S> {
    source: S,
    settings: DashboardConfig,
}

impl<S: RecordSource> Dashboard<S> {
    pub fn new(source: S, settings: DashboardConfig) -> Self {
        Self { source, settings }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn settings(&self) -> &DashboardConfig {
        &self.settings
    }

    /// Latest attendance logs, newest first.
    pub fn logs_query(&self) -> ListQuery {
        ListQuery::new(ATTENDANCE_LOG_DOCTYPE)
            .fields(&LOG_FIELDS)
            .order_by("creation desc")
            .limit(self.settings.log_limit)
    }

    /// Daily working-hours records of `date`, most hours first.
    pub fn hours_query(&self, date: NaiveDate) -> ListQuery {
        ListQuery::new(DAILY_HOURS_DOCTYPE)
            .fields(&HOURS_FIELDS)
            .filter("date", FilterOp::Eq, date.format("%Y-%m-%d").to_string())
            .order_by("working_hours desc")
            .limit(self.settings.analytics_limit)
    }

    /// Builds the live presence view.
    pub async fn presence(&self, filter: &ViewFilter) -> Result<PresenceView, ApiError> {
        let logs = self.fetch_logs().await?;
        let hours = self.fetch_hours_for_join(filter.date_or_today()).await;
        Ok(self.build_presence(filter, &logs, hours.as_deref().unwrap_or_default()))
    }

    /// Builds the analytics view for `date`.
    pub async fn analytics(&self, date: NaiveDate) -> Result<AnalyticsView, ApiError> {
        let records = self.fetch_hours(date).await?;
        Ok(build_analytics(date, &records))
    }

    /// Runs one full refresh.
    ///
    /// The day's hours are fetched once and feed both the presence join and
    /// the analytics view. When that fetch fails the presence view is still
    /// built and the snapshot carries no analytics.
    pub async fn refresh(&self, filter: &ViewFilter, include_analytics: bool) -> Result<DashboardSnapshot, ApiError> {
        let date = filter.date_or_today();
        let logs = self.fetch_logs().await?;
        let hours = self.fetch_hours_for_join(date).await;

        let presence = self.build_presence(filter, &logs, hours.as_deref().unwrap_or_default());
        let analytics = match (include_analytics, &hours) {
            (true, Some(records)) => Some(build_analytics(date, records)),
            _ => None,
        };

        Ok(DashboardSnapshot {
            generation: 0,
            refreshed_at: Local::now().naive_local(),
            filter: filter.clone(),
            presence,
            analytics,
        })
    }

    async fn fetch_logs(&self) -> Result<Vec<AttendanceLogRecord>, ApiError> {
        Ok(decode(self.source.get_list(&self.logs_query()).await?))
    }

    async fn fetch_hours(&self, date: NaiveDate) -> Result<Vec<DailyWorkingHoursRecord>, ApiError> {
        Ok(decode(self.source.get_list(&self.hours_query(date)).await?))
    }

    /// `None` when the hours could not be fetched; the failure is logged.
    async fn fetch_hours_for_join(&self, date: NaiveDate) -> Option<Vec<DailyWorkingHoursRecord>> {
        match self.fetch_hours(date).await {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!("{}", Message::HoursJoinFailed(e.to_string()));
                None
            }
        }
    }

    fn build_presence(&self, filter: &ViewFilter, logs: &[AttendanceLogRecord], hours: &[DailyWorkingHoursRecord]) -> PresenceView {
        let view = PresenceBuilder::new(Local::now().date_naive())
            .staff_filter(filter.staff.as_deref())
            .build(logs, &hours_by_employee(hours));

        tracing::debug!(
            logs = logs.len(),
            staff = view.entries.len(),
            present = view.present_count,
            away = view.away_count,
            "presence view built"
        );
        view
    }
}

fn build_analytics(date: NaiveDate, records: &[DailyWorkingHoursRecord]) -> AnalyticsView {
    let view = build_analytics_view_ordered(records, RowOrder::HoursDescending);
    tracing::debug!(%date, active = view.active_staff_count, total = view.total_hours, "analytics view built");
    view
}

fn decode<R: Record>(raw: Vec<Value>) -> Vec<R> {
    let (records, errors) = decode_records::<R>(raw);
    for error in errors {
        tracing::warn!(
            "{}",
            Message::SkippedRecord {
                doctype: error.doctype.to_string(),
                reason: error.to_string(),
            }
        );
    }
    records
}
