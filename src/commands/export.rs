use super::{open_dashboard, parse_date};
use crate::libs::{
    dashboard::ViewFilter,
    export::{ExportData, ExportFormat, Exporter},
};
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(value_enum, default_value = "presence")]
    data: ExportData,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Day whose working hours are exported (`today` or YYYY-MM-DD); presence
    /// exports join that day's hours
    #[arg(short, long, default_value = "today")]
    date: String,

    /// Only export staff whose id or name contains this text
    #[arg(short, long)]
    staff: Option<String>,
}

pub async fn cmd(args: ExportArgs, fixture: Option<&Path>) -> Result<()> {
    let date = parse_date(&args.date)?;
    let (dashboard, _) = open_dashboard(fixture)?;
    let exporter = Exporter::new(args.format, args.output);

    match args.data {
        ExportData::Presence => {
            let filter = ViewFilter {
                staff: args.staff,
                date: Some(date),
            };
            exporter.presence(&dashboard.presence(&filter).await?)
        }
        ExportData::Analytics => exporter.analytics(&dashboard.analytics(date).await?, date),
    }
}
