//! # Wadash - Warehouse Attendance Dashboard
//!
//! A command-line dashboard over the attendance records of a warehouse
//! workforce, read from the host web-application framework's generic list
//! API.
//!
//! ## Features
//!
//! - **Live Presence**: Who is checked in right now, with verification and geofence status
//! - **Workforce Analytics**: Daily hours per employee with totals, averages and a chart
//! - **Auto Refresh**: Periodic reloads with manual refresh and filter changes in between
//! - **Fixture Mode**: Run every view from a local JSON file instead of the backend
//! - **Data Export**: Export views to CSV, JSON, and Excel formats
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wadash::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
