pub mod analytics;
pub mod export;
pub mod init;
pub mod status;
pub mod watch;

use crate::{
    api::{ApiError, FixtureSource, FrappeClient, ListQuery, RecordSource},
    libs::{config::Config, dashboard::Dashboard, messages::Message},
    msg_bail_anyhow, msg_error_anyhow, msg_info,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Show who is checked in right now")]
    Status(status::StatusArgs),
    #[command(about = "Show working-hours analytics for a day")]
    Analytics(analytics::AnalyticsArgs),
    #[command(about = "Keep the dashboard on screen and refresh it periodically")]
    Watch(watch::WatchArgs),
    #[command(about = "Export a view to CSV, JSON or Excel")]
    Export(export::ExportArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Read records from a JSON fixture file instead of the backend
    #[arg(long, global = true, value_name = "FILE")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        let fixture = cli.fixture.as_deref();

        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Status(args) => status::cmd(args, fixture).await,
            Commands::Analytics(args) => analytics::cmd(args, fixture).await,
            Commands::Watch(args) => watch::cmd(args, fixture).await,
            Commands::Export(args) => export::cmd(args, fixture).await,
        }
    }
}

/// Where the dashboard reads its records from.
pub enum Source {
    Frappe(FrappeClient),
    Fixture(FixtureSource),
}

impl Source {
    /// A fixture file wins over the configured server.
    pub fn resolve(fixture: Option<&Path>, config: &Config) -> Result<Self> {
        if let Some(path) = fixture {
            let source = FixtureSource::from_file(path)?;
            msg_info!(Message::FixtureLoaded(path.display().to_string()));
            return Ok(Source::Fixture(source));
        }

        match &config.server {
            Some(server) => Ok(Source::Frappe(FrappeClient::new(server)?)),
            None => msg_bail_anyhow!(Message::ServerNotConfigured),
        }
    }
}

impl RecordSource for Source {
    async fn get_list(&self, query: &ListQuery) -> Result<Vec<Value>, ApiError> {
        match self {
            Source::Frappe(client) => client.get_list(query).await,
            Source::Fixture(fixture) => fixture.get_list(query).await,
        }
    }
}

/// Reads the configuration (file + environment) and builds the dashboard.
pub fn open_dashboard(fixture: Option<&Path>) -> Result<(Dashboard<Source>, Config)> {
    let config = Config::read()?.with_env();
    let source = Source::resolve(fixture, &config)?;
    Ok((Dashboard::new(source, config.dashboard()), config))
}

/// Accepts `today` or `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    if input.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| msg_error_anyhow!(Message::InvalidDate(input.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-05-01").unwrap(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(parse_date("Today").unwrap(), Local::now().date_naive());
        assert!(parse_date("01/05/2024").is_err());
    }

    #[test]
    fn test_resolve_without_server_fails() {
        let result = Source::resolve(None, &Config::default());
        assert!(result.is_err());
    }
}
