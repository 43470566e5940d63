//! Export of the dashboard views to files.
//!
//! Writes the presence or analytics view as CSV, pretty-printed JSON or an
//! Excel workbook. Values are exported as displayed, plus the raw numbers
//! where the view carries them.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wadash::libs::export::{ExportFormat, Exporter};
//! use wadash::libs::presence::PresenceView;
//!
//! let exporter = Exporter::new(ExportFormat::Csv, None);
//! exporter.presence(&PresenceView::default())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::analytics::AnalyticsView;
use crate::libs::messages::Message;
use crate::libs::presence::PresenceView;
use crate::msg_success;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rust_xlsxwriter::{Color, Format, Workbook};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const PRESENCE_HEADERS: [&str; 10] = [
    "Staff",
    "Name",
    "Status",
    "Since",
    "Session",
    "Today",
    "Verification",
    "Location",
    "Map",
    "Log",
];

const ANALYTICS_HEADERS: [&str; 5] = ["Employee", "Name", "Sessions", "Hours", "Record"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    /// Excel workbook (.xlsx)
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

/// Which view to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportData {
    Presence,
    Analytics,
}

#[derive(Debug, Serialize)]
struct AnalyticsExport<'a> {
    date: String,
    #[serde(flatten)]
    view: &'a AnalyticsView,
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Without an explicit path the file is named after the current time,
    /// e.g. `wadash_export_20240501_173000.csv`.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "wadash_export_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        });

        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn presence(&self, view: &PresenceView) -> Result<()> {
        match self.format {
            ExportFormat::Csv => self.presence_csv(view)?,
            ExportFormat::Json => self.write_json(view)?,
            ExportFormat::Excel => self.presence_excel(view)?,
        }

        msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
        Ok(())
    }

    pub fn analytics(&self, view: &AnalyticsView, date: NaiveDate) -> Result<()> {
        match self.format {
            ExportFormat::Csv => self.analytics_csv(view)?,
            ExportFormat::Json => self.write_json(&AnalyticsExport {
                date: date.format("%Y-%m-%d").to_string(),
                view,
            })?,
            ExportFormat::Excel => self.analytics_excel(view, date)?,
        }

        msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
        Ok(())
    }

    fn write_json<T: Serialize>(&self, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        File::create(&self.output_path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    fn presence_csv(&self, view: &PresenceView) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(PRESENCE_HEADERS)?;

        for entry in &view.entries {
            wtr.write_record([
                entry.staff_id.clone(),
                entry.display_name.clone(),
                entry.current_log_type.to_string(),
                entry.formatted_timestamp.clone(),
                entry.formatted_work_hours.clone().unwrap_or_default(),
                entry.formatted_daily_hours.clone(),
                entry.verification_status.to_string(),
                entry.location_indicator.to_string(),
                entry.map_link.clone().unwrap_or_default(),
                entry.log_id.clone(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn analytics_csv(&self, view: &AnalyticsView) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(ANALYTICS_HEADERS)?;

        for row in &view.rows {
            wtr.write_record([
                row.employee_id.clone(),
                row.display_name.clone(),
                row.session_count.to_string(),
                row.formatted_total_hours.clone(),
                row.record_id.clone(),
            ])?;
        }

        let active = view.active_staff_count.to_string();
        wtr.write_record(["", "", "", "", ""])?;
        wtr.write_record(["Total", "", "", view.total_hours_formatted.as_str(), ""])?;
        wtr.write_record(["Average", "", "", view.avg_hours_formatted.as_str(), ""])?;
        wtr.write_record(["Active staff", "", "", active.as_str(), ""])?;

        wtr.flush()?;
        Ok(())
    }

    fn presence_excel(&self, view: &PresenceView) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Presence")?;

        let header_format = header_format();
        for (col, header) in PRESENCE_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (i, entry) in view.entries.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet.write_string(row, 0, &entry.staff_id)?;
            worksheet.write_string(row, 1, &entry.display_name)?;
            worksheet.write_string(row, 2, entry.current_log_type.to_string())?;
            worksheet.write_string(row, 3, &entry.formatted_timestamp)?;
            worksheet.write_string(row, 4, entry.formatted_work_hours.as_deref().unwrap_or(""))?;
            worksheet.write_number(row, 5, entry.daily_hours)?;
            worksheet.write_string(row, 6, entry.verification_status.to_string())?;
            worksheet.write_string(row, 7, entry.location_indicator.to_string())?;
            if let Some(link) = &entry.map_link {
                worksheet.write_url(row, 8, link.as_str())?;
            }
            worksheet.write_string(row, 9, &entry.log_id)?;
        }

        let summary_row = (view.entries.len() + 2) as u32;
        worksheet.write_string_with_format(summary_row, 0, "Present", &header_format)?;
        worksheet.write_number(summary_row, 1, view.present_count as f64)?;
        worksheet.write_string_with_format(summary_row + 1, 0, "Away", &header_format)?;
        worksheet.write_number(summary_row + 1, 1, view.away_count as f64)?;

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }

    fn analytics_excel(&self, view: &AnalyticsView, date: NaiveDate) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(date.format("%Y-%m-%d").to_string())?;

        let header_format = header_format();
        for (col, header) in ANALYTICS_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (i, row) in view.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            worksheet.write_string(r, 0, &row.employee_id)?;
            worksheet.write_string(r, 1, &row.display_name)?;
            worksheet.write_number(r, 2, row.session_count as f64)?;
            worksheet.write_number(r, 3, row.raw_working_hours)?;
            worksheet.write_string(r, 4, &row.record_id)?;
        }

        let summary_row = (view.rows.len() + 2) as u32;
        worksheet.write_string_with_format(summary_row, 0, "Total hours", &header_format)?;
        worksheet.write_number(summary_row, 3, view.total_hours)?;
        worksheet.write_string_with_format(summary_row + 1, 0, "Average hours", &header_format)?;
        worksheet.write_number(summary_row + 1, 3, view.avg_hours)?;
        worksheet.write_string_with_format(summary_row + 2, 0, "Active staff", &header_format)?;
        worksheet.write_number(summary_row + 2, 3, view.active_staff_count as f64)?;

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }
}

fn header_format() -> Format {
    Format::new().set_bold().set_background_color(Color::Gray)
}
