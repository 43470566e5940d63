use super::{open_dashboard, parse_date};
use crate::{
    libs::{messages::Message, view::View},
    msg_print,
};
use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    /// Day to report on (`today` or YYYY-MM-DD)
    #[arg(short, long, default_value = "today")]
    date: String,

    /// Print the view as JSON
    #[arg(long)]
    json: bool,

    /// Also print a link to each daily record in the backend
    #[arg(long)]
    links: bool,
}

pub async fn cmd(args: AnalyticsArgs, fixture: Option<&Path>) -> Result<()> {
    let date = parse_date(&args.date)?;
    let (dashboard, config) = open_dashboard(fixture)?;
    let view = dashboard.analytics(date).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let day = date.format("%Y-%m-%d").to_string();
    msg_print!(Message::AnalyticsHeader(day.clone()), true);
    View::analytics(&view, &day)?;

    if args.links {
        if let Some(server) = config.server.as_ref().filter(|_| fixture.is_none()) {
            println!();
            for row in &view.rows {
                println!("{:<24} {}", row.display_name, row.detail_link(&server.api_url));
            }
        }
    }
    Ok(())
}
