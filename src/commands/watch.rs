//! Live dashboard in the terminal.
//!
//! Keeps refreshing the presence view (and optionally analytics) on a fixed
//! interval. While running, lines typed on stdin control it:
//! - empty line: refresh now
//! - `-`: clear the staff filter
//! - any other text: filter staff by that text and refresh

use super::open_dashboard;
use crate::{
    libs::{
        dashboard::ViewFilter,
        messages::Message,
        refresher::{Refresher, RefresherConfig},
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::io::BufRead;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const CLEAR_FILTER: &str = "-";

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes; defaults to the configured interval
    #[arg(short, long)]
    interval: Option<u64>,

    /// Only show staff whose id or name contains this text
    #[arg(short, long)]
    staff: Option<String>,

    /// Also show today's working-hours analytics
    #[arg(short, long)]
    analytics: bool,
}

pub async fn cmd(args: WatchArgs, fixture: Option<&Path>) -> Result<()> {
    let (dashboard, _) = open_dashboard(fixture)?;
    let interval = args.interval.unwrap_or(dashboard.settings().refresh_interval).max(1);

    let cancel = CancellationToken::new();
    let handle = Refresher::spawn(
        dashboard,
        RefresherConfig {
            interval: Duration::from_secs(interval),
            include_analytics: args.analytics,
            filter: ViewFilter {
                staff: args.staff,
                date: None,
            },
        },
        cancel.clone(),
    );

    msg_info!(Message::WatchStarted(interval));

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => msg_info!(Message::WatchStopping, true),
            Err(e) => msg_error!(Message::WatchCtrlCListenFailed(e.to_string())),
        }
        signal_cancel.cancel();
    });

    let mut snapshots = handle.subscribe();
    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    View::snapshot(&snapshot)?;
                    msg_print!(Message::WatchControls, true);
                }
            }
            line = lines.recv(), if stdin_open => match line {
                Some(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        handle.refresh().await?;
                    } else {
                        let staff = (input != CLEAR_FILTER).then(|| input.to_string());
                        msg_info!(Message::WatchFilterApplied(staff.clone().unwrap_or_default()));
                        handle.set_filter(ViewFilter { staff, date: None }).await?;
                    }
                }
                None => stdin_open = false,
            },
        }
    }

    handle.shutdown().await;
    msg_success!(Message::WatchStopped);
    Ok(())
}

/// Forwards stdin lines from a detached thread so exiting never waits on a
/// pending read.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
