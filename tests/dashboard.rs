#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wadash::api::{ApiError, FixtureSource, ListQuery, RecordSource, ATTENDANCE_LOG_DOCTYPE, DAILY_HOURS_DOCTYPE};
    use wadash::libs::config::DashboardConfig;
    use wadash::libs::dashboard::{Dashboard, ViewFilter};

    /// Serves logs from a fixture but fails every working-hours query.
    struct HoursUnavailable(FixtureSource);

    impl RecordSource for HoursUnavailable {
        async fn get_list(&self, query: &ListQuery) -> Result<Vec<Value>, ApiError> {
            if query.doctype == DAILY_HOURS_DOCTYPE {
                return Err(ApiError::Status {
                    status: 503,
                    body: "maintenance".to_string(),
                });
            }
            self.0.get_list(query).await
        }
    }

    /// Counts the working-hours queries it serves.
    struct CountingHours {
        inner: FixtureSource,
        hours_queries: AtomicUsize,
    }

    impl RecordSource for CountingHours {
        async fn get_list(&self, query: &ListQuery) -> Result<Vec<Value>, ApiError> {
            if query.doctype == DAILY_HOURS_DOCTYPE {
                self.hours_queries.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.get_list(query).await
        }
    }

    struct Offline;

    impl RecordSource for Offline {
        async fn get_list(&self, _query: &ListQuery) -> Result<Vec<Value>, ApiError> {
            Err(ApiError::Decode("offline".to_string()))
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn fixture() -> FixtureSource {
        FixtureSource::new()
            .with_records(
                ATTENDANCE_LOG_DOCTYPE,
                vec![
                    json!({"name": "L1", "staff": "A", "staff_name": "Alice", "logtype": "IN", "creation": "2024-05-01 08:00:00"}),
                    json!({"name": "L2", "staff": "B", "staff_name": "Bob", "logtype": "IN", "creation": "2024-05-01 08:30:00"}),
                    json!({"name": "L3", "staff": "A", "logtype": "OUT", "creation": "2024-05-01 16:00:00", "work_hours": 8.0}),
                    json!({"name": "broken", "logtype": "IN", "creation": "2024-05-01 09:00:00"}),
                ],
            )
            .with_records(
                DAILY_HOURS_DOCTYPE,
                vec![
                    json!({"name": "D1", "employee": "A", "employee_name": "Alice", "working_hours": 8.0, "attendance_log": ["L1", "L3"], "date": "2024-05-01"}),
                    json!({"name": "D2", "employee": "B", "employee_name": "Bob", "working_hours": 9.5, "attendance_log": ["L2"], "date": "2024-05-01"}),
                    json!({"name": "D0", "employee": "A", "working_hours": 7.0, "date": "2024-04-30"}),
                ],
            )
    }

    fn filter() -> ViewFilter {
        ViewFilter {
            staff: None,
            date: Some(day()),
        }
    }

    #[test]
    fn test_queries() {
        let dashboard = Dashboard::new(fixture(), DashboardConfig::default());

        let logs = dashboard.logs_query();
        assert_eq!(logs.doctype, ATTENDANCE_LOG_DOCTYPE);
        assert_eq!(logs.order_by.as_deref(), Some("creation desc"));
        assert_eq!(logs.limit, Some(50));

        let hours = dashboard.hours_query(day());
        assert_eq!(hours.order_by.as_deref(), Some("working_hours desc"));
        assert_eq!(hours.limit, Some(100));
        assert_eq!(hours.filters[0].field, "date");
        assert_eq!(hours.filters[0].value, json!("2024-05-01"));
    }

    #[tokio::test]
    async fn test_presence_dedups_joins_and_skips_bad_records() {
        let dashboard = Dashboard::new(fixture(), DashboardConfig::default());
        let view = dashboard.presence(&filter()).await.unwrap();

        // newest first: A (OUT, 16:00) then B
        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.entries[0].staff_id, "A");
        assert_eq!(view.entries[0].log_id, "L3");
        assert_eq!(view.entries[0].formatted_daily_hours, "8h 0m");
        assert_eq!(view.entries[1].formatted_daily_hours, "9h 30m");
        assert_eq!((view.present_count, view.away_count), (1, 1));
    }

    #[tokio::test]
    async fn test_presence_survives_hours_failure() {
        let dashboard = Dashboard::new(HoursUnavailable(fixture()), DashboardConfig::default());
        let view = dashboard.presence(&filter()).await.unwrap();

        assert_eq!(view.entries.len(), 2);
        assert!(view.entries.iter().all(|e| e.daily_hours == 0.0));
    }

    #[tokio::test]
    async fn test_refresh_with_analytics_survives_hours_failure() {
        let dashboard = Dashboard::new(HoursUnavailable(fixture()), DashboardConfig::default());
        let snapshot = dashboard.refresh(&filter(), true).await.unwrap();

        assert_eq!(snapshot.presence.entries.len(), 2);
        assert!(snapshot.presence.entries.iter().all(|e| e.daily_hours == 0.0));
        assert!(snapshot.analytics.is_none());
    }

    #[tokio::test]
    async fn test_refresh_fetches_hours_once() {
        let dashboard = Dashboard::new(
            CountingHours {
                inner: fixture(),
                hours_queries: AtomicUsize::new(0),
            },
            DashboardConfig::default(),
        );
        let snapshot = dashboard.refresh(&filter(), true).await.unwrap();

        let analytics = snapshot.analytics.unwrap();
        assert_eq!(snapshot.presence.entries[1].daily_hours, analytics.rows[0].raw_working_hours);
        assert_eq!(dashboard.source().hours_queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_analytics_for_day() {
        let dashboard = Dashboard::new(fixture(), DashboardConfig::default());
        let view = dashboard.analytics(day()).await.unwrap();

        assert_eq!(view.active_staff_count, 2);
        assert_eq!(view.total_hours_formatted, "17h 30m");
        assert_eq!(view.rows[0].employee_id, "B");
        assert_eq!(view.rows[1].session_count, 2);
    }

    #[tokio::test]
    async fn test_refresh_snapshot() {
        let dashboard = Dashboard::new(fixture(), DashboardConfig::default());

        let snapshot = dashboard.refresh(&filter(), true).await.unwrap();
        assert_eq!(snapshot.generation, 0);
        assert_eq!(snapshot.filter, filter());
        assert_eq!(snapshot.presence.entries.len(), 2);
        assert_eq!(snapshot.analytics.unwrap().active_staff_count, 2);

        let without = dashboard.refresh(&filter(), false).await.unwrap();
        assert!(without.analytics.is_none());
    }

    #[tokio::test]
    async fn test_staff_filter_narrows_presence() {
        let dashboard = Dashboard::new(fixture(), DashboardConfig::default());
        let filter = ViewFilter {
            staff: Some("bob".to_string()),
            date: Some(day()),
        };
        let view = dashboard.presence(&filter).await.unwrap();

        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].staff_id, "B");
    }

    #[tokio::test]
    async fn test_log_fetch_failure_is_an_error() {
        let dashboard = Dashboard::new(Offline, DashboardConfig::default());
        assert!(dashboard.presence(&filter()).await.is_err());
        assert!(dashboard.refresh(&filter(), true).await.is_err());
    }
}
