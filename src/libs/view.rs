//! Terminal rendering of the dashboard views.
//!
//! Tables are drawn with `prettytable`; the working-hours chart is a plain
//! text bar chart so it renders in any terminal.

use crate::libs::analytics::{AnalyticsView, ChartSeries};
use crate::libs::dashboard::DashboardSnapshot;
use crate::libs::formatter::format_hours;
use crate::libs::messages::Message;
use crate::libs::presence::PresenceView;
use crate::{msg_info, msg_print};
use anyhow::Result;
use prettytable::{format, row, Table};

const CHART_WIDTH: usize = 40;
const CHART_BAR: char = '█';

pub struct View {}

impl View {
    /// Prints the presence counters followed by one row per staff member.
    pub fn presence(view: &PresenceView) -> Result<()> {
        msg_print!(Message::PresenceCounters {
            present: view.present_count,
            away: view.away_count,
        });

        if view.entries.is_empty() {
            msg_info!(Message::NoStaffRecords);
            return Ok(());
        }

        Self::presence_table(view).printstd();
        Ok(())
    }

    pub fn presence_table(view: &PresenceView) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["STAFF", "NAME", "STATUS", "SINCE", "SESSION", "TODAY", "VERIFIED", "LOCATION", "MAP"]);

        for entry in &view.entries {
            let status = if entry.is_present() { "● IN" } else { "○ OUT" };
            table.add_row(row![
                entry.staff_id,
                entry.display_name,
                status,
                entry.formatted_timestamp,
                entry.formatted_work_hours.as_deref().unwrap_or("-"),
                entry.formatted_daily_hours,
                entry.verification_status,
                entry.location_indicator,
                entry.map_link.as_deref().unwrap_or("-")
            ]);
        }
        table
    }

    /// Prints the summary cards, the per-employee table and the chart.
    pub fn analytics(view: &AnalyticsView, date: &str) -> Result<()> {
        if view.rows.is_empty() {
            msg_info!(Message::NoWorkingHours(date.to_string()));
            return Ok(());
        }

        msg_print!(Message::TotalHours(view.total_hours_formatted.clone()));
        msg_print!(Message::ActiveStaff(view.active_staff_count));
        msg_print!(Message::AverageHours(view.avg_hours_formatted.clone()));

        Self::analytics_table(view).printstd();

        msg_print!(Message::WorkingHoursChartHeader, true);
        for line in Self::chart(&view.chart_series) {
            println!("{}", line);
        }
        Ok(())
    }

    pub fn analytics_table(view: &AnalyticsView) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["EMPLOYEE", "NAME", "SESSIONS", "HOURS", "RECORD"]);

        for entry in &view.rows {
            table.add_row(row![
                entry.employee_id,
                entry.display_name,
                r->entry.session_count,
                r->entry.formatted_total_hours,
                entry.record_id
            ]);
        }
        table
    }

    /// Renders one line per series item, bars scaled to the largest value.
    pub fn chart(series: &ChartSeries) -> Vec<String> {
        if series.is_empty() {
            return Vec::new();
        }

        let label_width = series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = series.max_value();

        series
            .labels
            .iter()
            .zip(&series.values)
            .map(|(label, value)| {
                let width = if max > 0.0 {
                    ((value / max) * CHART_WIDTH as f64).round() as usize
                } else {
                    0
                };
                let bar: String = std::iter::repeat(CHART_BAR).take(width).collect();
                format!("{:<label_width$} │{} {}", label, bar, format_hours(Some(*value)))
            })
            .collect()
    }

    /// Full-screen render of one snapshot, used by `watch`.
    pub fn snapshot(snapshot: &DashboardSnapshot) -> Result<()> {
        // ANSI clear screen + cursor home
        print!("\x1B[2J\x1B[1;1H");

        msg_print!(Message::PresenceHeader(snapshot.refreshed_at.format("%Y-%m-%d %H:%M:%S").to_string()));
        Self::presence(&snapshot.presence)?;

        if let Some(analytics) = &snapshot.analytics {
            let date = snapshot.filter.date_or_today().format("%Y-%m-%d").to_string();
            msg_print!(Message::AnalyticsHeader(date.clone()), true);
            Self::analytics(analytics, &date)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_scales_to_largest_value() {
        let series = ChartSeries {
            labels: vec!["Alice".to_string(), "Bo".to_string()],
            values: vec![8.0, 4.0],
        };
        let lines = View::chart(&series);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches(CHART_BAR).count(), CHART_WIDTH);
        assert_eq!(lines[1].matches(CHART_BAR).count(), CHART_WIDTH / 2);
        assert!(lines[0].ends_with("8h 0m"));
        assert!(lines[1].starts_with("Bo    │"));
    }

    #[test]
    fn test_chart_with_zero_values_has_no_bars() {
        let series = ChartSeries {
            labels: vec!["Idle".to_string()],
            values: vec![0.0],
        };
        assert_eq!(View::chart(&series), vec!["Idle │ 0h 0m".to_string()]);
    }

    #[test]
    fn test_empty_chart_has_no_lines() {
        assert!(View::chart(&ChartSeries::default()).is_empty());
    }
}
