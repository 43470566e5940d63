//! Workforce analytics view built from daily working-hours records.
//!
//! One record is one employee's day, so the number of records is the number
//! of active staff. The view carries headline totals, one summary row per
//! record and a chart series aligned with the rows.
//!
//! ## Calculation
//!
//! ```text
//! total   = Σ working_hours            (missing / non-numeric → 0)
//! active  = number of records
//! average = total / active             (0 when active == 0)
//! ```

use crate::libs::formatter::format_hours;
use crate::libs::records::DailyWorkingHoursRecord;
use serde::Serialize;

/// Row ordering applied by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// Keep the order the records were given in.
    #[default]
    AsGiven,
    /// Most hours first; ties keep input order.
    HoursDescending,
}

/// One employee row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeSummaryEntry {
    pub employee_id: String,
    pub display_name: String,
    /// Number of attendance logs linked to the day.
    pub session_count: usize,
    pub formatted_total_hours: String,
    pub raw_working_hours: f64,
    /// Identifier of the daily record, used to open its detail view.
    pub record_id: String,
}

/// Parallel label/value sequences for a bar chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsView {
    pub total_hours: f64,
    pub total_hours_formatted: String,
    pub active_staff_count: usize,
    pub avg_hours: f64,
    pub avg_hours_formatted: String,
    pub rows: Vec<EmployeeSummaryEntry>,
    pub chart_series: ChartSeries,
}

impl Default for AnalyticsView {
    fn default() -> Self {
        build_analytics_view(&[])
    }
}

/// Builds the analytics view keeping the input order of `daily_records`.
pub fn build_analytics_view(daily_records: &[DailyWorkingHoursRecord]) -> AnalyticsView {
    build_analytics_view_ordered(daily_records, RowOrder::AsGiven)
}

pub fn build_analytics_view_ordered(daily_records: &[DailyWorkingHoursRecord], order: RowOrder) -> AnalyticsView {
    let total_hours: f64 = daily_records.iter().map(DailyWorkingHoursRecord::hours).sum();
    let active_staff_count = daily_records.len();
    let avg_hours = if active_staff_count > 0 {
        total_hours / active_staff_count as f64
    } else {
        0.0
    };

    let mut rows: Vec<EmployeeSummaryEntry> = daily_records.iter().map(summary_row).collect();
    if order == RowOrder::HoursDescending {
        // sort_by is stable, equal hours keep input order
        rows.sort_by(|a, b| b.raw_working_hours.total_cmp(&a.raw_working_hours));
    }

    let chart_series = ChartSeries {
        labels: rows.iter().map(|row| row.display_name.clone()).collect(),
        values: rows.iter().map(|row| row.raw_working_hours).collect(),
    };

    AnalyticsView {
        total_hours,
        total_hours_formatted: format_hours(Some(total_hours)),
        active_staff_count,
        avg_hours,
        avg_hours_formatted: format_hours(Some(avg_hours)),
        rows,
        chart_series,
    }
}

fn summary_row(record: &DailyWorkingHoursRecord) -> EmployeeSummaryEntry {
    let hours = record.hours();
    EmployeeSummaryEntry {
        employee_id: record.employee.clone(),
        display_name: record.display_name().to_string(),
        session_count: record.attendance_log.len(),
        formatted_total_hours: format_hours(Some(hours)),
        raw_working_hours: hours,
        record_id: record.name.clone(),
    }
}

impl EmployeeSummaryEntry {
    /// Desk URL of the daily record behind this row.
    pub fn detail_link(&self, base_url: &str) -> String {
        format!(
            "{}/app/staff-daily-working-hours/{}",
            base_url.trim_end_matches('/'),
            self.record_id
        )
    }
}
