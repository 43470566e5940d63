use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigModuleServer => "Server settings".to_string(),
            Message::ConfigModuleDashboard => "Dashboard settings".to_string(),
            Message::ServerNotConfigured => "Server is not configured. Run `wadash init` or pass --fixture <FILE>.".to_string(),
            Message::FixtureLoaded(path) => format!("Using fixture data from {}", path),

            Message::PresenceHeader(at) => format!("Warehouse live status ({})", at),
            Message::PresenceCounters { present, away } => format!("Present: {}   Away: {}", present, away),
            Message::NoStaffRecords => "No attendance logs found.".to_string(),

            Message::AnalyticsHeader(date) => format!("Workforce insights for {}", date),
            Message::NoWorkingHours(date) => format!("No working hours recorded for {}", date),
            Message::TotalHours(hours) => format!("Total hours: {}", hours),
            Message::ActiveStaff(count) => format!("Active staff: {}", count),
            Message::AverageHours(hours) => format!("Average hours: {}", hours),
            Message::WorkingHoursChartHeader => "Working hours".to_string(),

            Message::RefreshFailed(error) => format!("Refresh failed: {}", error),
            Message::HoursJoinFailed(error) => format!("Could not load daily working hours, showing presence only: {}", error),
            Message::SkippedRecord { doctype, reason } => format!("Skipped malformed {} record: {}", doctype, reason),
            Message::RefreshSuperseded(generation) => format!("Refresh #{} superseded by a newer request", generation),
            Message::RefreshTaskPanicked(error) => format!("Refresh task panicked: {}", error),

            Message::WatchStarted(interval) => format!("Watching attendance, refreshing every {}s. Press Ctrl-C to stop.", interval),
            Message::WatchControls => "Enter: refresh now | text + Enter: filter by staff | '-' + Enter: clear filter".to_string(),
            Message::WatchFilterApplied(filter) if filter.is_empty() => "Staff filter cleared".to_string(),
            Message::WatchFilterApplied(filter) => format!("Filtering staff by '{}'", filter),
            Message::WatchStopping => "Stopping dashboard refresh...".to_string(),
            Message::WatchStopped => "Dashboard refresh stopped".to_string(),
            Message::WatchCtrlCListenFailed(error) => format!("Failed to listen for Ctrl-C: {}", error),

            Message::ExportCompleted(path) => format!("Export completed successfully: {}", path),

            Message::InvalidDate(input) => format!("Invalid date '{}', expected YYYY-MM-DD", input),

            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptServerApiUrl => "Enter the backend URL".to_string(),
            Message::PromptServerApiKey => "Enter your API key".to_string(),
            Message::PromptServerApiSecret => "Enter your API secret".to_string(),
            Message::PromptRefreshInterval => "Refresh interval (seconds)".to_string(),
            Message::PromptLogLimit => "Attendance logs per refresh".to_string(),
            Message::PromptAnalyticsLimit => "Daily hours records per refresh".to_string(),
        };

        write!(f, "{}", text)
    }
}
