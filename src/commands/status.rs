use super::Source;
use crate::{
    libs::{
        config::Config,
        dashboard::{Dashboard, ViewFilter},
        messages::Message,
        view::View,
    },
    msg_print,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Only show staff whose id or name contains this text
    #[arg(short, long)]
    staff: Option<String>,

    /// Number of latest attendance logs to read
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print the view as JSON
    #[arg(long)]
    json: bool,
}

pub async fn cmd(args: StatusArgs, fixture: Option<&Path>) -> Result<()> {
    let config = Config::read()?.with_env();
    let mut settings = config.dashboard();
    if let Some(limit) = args.limit {
        settings.log_limit = limit;
    }

    let dashboard = Dashboard::new(Source::resolve(fixture, &config)?, settings);
    let filter = ViewFilter {
        staff: args.staff,
        date: None,
    };
    let view = dashboard.presence(&filter).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    msg_print!(Message::PresenceHeader(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()), true);
    View::presence(&view)
}
