#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleServer,
    ConfigModuleDashboard,
    ServerNotConfigured,
    FixtureLoaded(String), // path

    // === PRESENCE MESSAGES ===
    PresenceHeader(String), // refreshed at
    PresenceCounters {
        present: usize,
        away: usize,
    },
    NoStaffRecords,

    // === ANALYTICS MESSAGES ===
    AnalyticsHeader(String),  // date
    NoWorkingHours(String),   // date
    TotalHours(String),       // formatted hours
    ActiveStaff(usize),       // count
    AverageHours(String),     // formatted hours
    WorkingHoursChartHeader,

    // === REFRESH MESSAGES ===
    RefreshFailed(String),   // error
    HoursJoinFailed(String), // error
    SkippedRecord {
        doctype: String,
        reason: String,
    },
    RefreshSuperseded(u64), // generation
    RefreshTaskPanicked(String),

    // === WATCH MESSAGES ===
    WatchStarted(u64), // interval seconds
    WatchControls,
    WatchFilterApplied(String), // staff filter, empty when cleared
    WatchStopping,
    WatchStopped,
    WatchCtrlCListenFailed(String),

    // === EXPORT MESSAGES ===
    ExportCompleted(String), // path

    // === INPUT MESSAGES ===
    InvalidDate(String),

    // === PROMPT MESSAGES ===
    PromptSelectModules,
    PromptServerApiUrl,
    PromptServerApiKey,
    PromptServerApiSecret,
    PromptRefreshInterval,
    PromptLogLimit,
    PromptAnalyticsLimit,
}
