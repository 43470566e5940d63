#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use wadash::libs::geo::LocationIndicator;
    use wadash::libs::presence::{hours_by_employee, PresenceBuilder};
    use wadash::libs::records::{AttendanceLogRecord, DailyWorkingHoursRecord, LogType};

    const LOCATION: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Point","coordinates":[90.4125,23.8103]}}]}"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn log(name: &str, staff: &str, logtype: &str, creation: &str) -> AttendanceLogRecord {
        log_with(json!({"name": name, "staff": staff, "logtype": logtype, "creation": creation}))
    }

    fn log_with(value: Value) -> AttendanceLogRecord {
        serde_json::from_value(value).unwrap()
    }

    fn build(logs: &[AttendanceLogRecord]) -> wadash::libs::presence::PresenceView {
        PresenceBuilder::new(today()).build(logs, &HashMap::new())
    }

    #[test]
    fn test_latest_log_per_staff_from_sorted_input() {
        let logs = vec![
            log("L3", "A", "OUT", "2024-05-01 17:00:00"),
            log("L2", "A", "IN", "2024-05-01 09:00:00"),
            log("L1", "B", "IN", "2024-05-01 18:00:00"),
        ];
        let view = build(&logs);

        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.entries[0].staff_id, "A");
        assert_eq!(view.entries[0].current_log_type, LogType::Out);
        assert_eq!(view.entries[0].log_id, "L3");
        assert_eq!(view.entries[1].staff_id, "B");
        assert_eq!(view.entries[1].current_log_type, LogType::In);
        assert_eq!(view.present_count, 1);
        assert_eq!(view.away_count, 1);
    }

    #[test]
    fn test_unsorted_input_still_keeps_newest_log() {
        let logs = vec![
            log("L1", "A", "IN", "2024-05-01 09:00:00"),
            log("L2", "B", "IN", "2024-05-01 09:30:00"),
            log("L3", "A", "OUT", "2024-05-01 17:00:00"),
        ];
        let view = build(&logs);

        assert_eq!(view.entries.iter().map(|e| e.staff_id.as_str()).collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(view.entries[0].log_id, "L3");
        assert!(!view.entries[0].is_present());
    }

    #[test]
    fn test_equal_timestamps_keep_first_seen() {
        let logs = vec![
            log("L2", "A", "OUT", "2024-05-01 17:00:00"),
            log("L1", "A", "IN", "2024-05-01 17:00:00"),
        ];
        assert_eq!(build(&logs).entries[0].log_id, "L2");
    }

    #[test]
    fn test_counts_match_entries() {
        let logs = vec![
            log("L1", "A", "IN", "2024-05-01 08:00:00"),
            log("L2", "B", "IN", "2024-05-01 08:01:00"),
            log("L3", "C", "OUT", "2024-05-01 08:02:00"),
            log("L4", "A", "OUT", "2024-05-01 07:00:00"),
        ];
        let view = build(&logs);

        assert_eq!(view.present_count + view.away_count, view.entries.len());
        assert_eq!(view.present_count, view.entries.iter().filter(|e| e.is_present()).count());
        assert_eq!(view.present_count, 2);
    }

    #[test]
    fn test_empty_logs_give_empty_view() {
        let view = build(&[]);
        assert!(view.entries.is_empty());
        assert_eq!((view.present_count, view.away_count), (0, 0));
    }

    #[test]
    fn test_work_hours_only_on_check_out() {
        let logs = vec![
            log_with(json!({"staff": "A", "logtype": "OUT", "creation": "2024-05-01 17:00:00", "work_hours": 8.12})),
            log_with(json!({"staff": "B", "logtype": "IN", "creation": "2024-05-01 09:00:00", "work_hours": 2.0})),
            log_with(json!({"staff": "C", "logtype": "OUT", "creation": "2024-05-01 12:00:00"})),
        ];
        let view = build(&logs);

        assert_eq!(view.entries[0].formatted_work_hours.as_deref(), Some("8h 7m"));
        assert_eq!(view.entries[1].formatted_work_hours, None);
        assert_eq!(view.entries[2].formatted_work_hours, None);
    }

    #[test]
    fn test_daily_hours_join() {
        let records: Vec<DailyWorkingHoursRecord> = serde_json::from_value(json!([
            {"employee": "A", "working_hours": 3.5},
            {"employee": "A", "working_hours": 1.0},
            {"employee": "Z", "working_hours": 9.0}
        ]))
        .unwrap();
        let hours = hours_by_employee(&records);
        assert_eq!(hours.get("A"), Some(&4.5));

        let logs = vec![
            log("L1", "A", "IN", "2024-05-01 08:00:00"),
            log("L2", "B", "IN", "2024-05-01 08:00:00"),
        ];
        let view = PresenceBuilder::new(today()).build(&logs, &hours);

        assert_eq!(view.entries[0].daily_hours, 4.5);
        assert_eq!(view.entries[0].formatted_daily_hours, "4h 30m");
        assert_eq!(view.entries[1].daily_hours, 0.0);
        assert_eq!(view.entries[1].formatted_daily_hours, "0h 0m");
    }

    #[test]
    fn test_location_indicator_and_map_link() {
        let logs = vec![
            log_with(json!({"staff": "A", "logtype": "IN", "creation": "2024-05-01 08:00:00", "location": LOCATION, "is_near_warehouse": 1})),
            log_with(json!({"staff": "B", "logtype": "IN", "creation": "2024-05-01 08:00:00", "location": LOCATION, "is_near_warehouse": 0})),
            log_with(json!({"staff": "C", "logtype": "IN", "creation": "2024-05-01 08:00:00", "location": "{\"broken", "is_near_warehouse": 1})),
            log_with(json!({"staff": "D", "logtype": "IN", "creation": "2024-05-01 08:00:00"})),
        ];
        let view = build(&logs);

        assert_eq!(view.entries[0].location_indicator, LocationIndicator::OnSite);
        assert_eq!(
            view.entries[0].map_link.as_deref(),
            Some("https://www.google.com/maps?q=23.8103,90.4125")
        );
        assert_eq!(view.entries[1].location_indicator, LocationIndicator::OffSite);
        assert_eq!(view.entries[2].location_indicator, LocationIndicator::Unavailable);
        assert_eq!(view.entries[2].map_link, None);
        assert_eq!(view.entries[3].location_indicator, LocationIndicator::Unavailable);
    }

    #[test]
    fn test_location_without_features_has_no_map_link() {
        let logs = vec![
            log_with(json!({"staff": "A", "logtype": "IN", "creation": "2024-05-01 08:00:00", "location": r#"{"type":"FeatureCollection"}"#, "is_near_warehouse": 1})),
            log_with(json!({"staff": "B", "logtype": "IN", "creation": "2024-05-01 08:00:00", "location": {"type": "FeatureCollection"}, "is_near_warehouse": 0})),
        ];
        let view = build(&logs);

        assert_eq!(view.entries.len(), 2);
        for entry in &view.entries {
            assert_eq!(entry.location_indicator, LocationIndicator::Unavailable);
            assert_eq!(entry.map_link, None);
        }
    }

    #[test]
    fn test_staff_filter_matches_id_or_name() {
        let logs = vec![
            log_with(json!({"staff": "WS-01", "staff_name": "Alice Rahman", "logtype": "IN", "creation": "2024-05-01 08:00:00"})),
            log_with(json!({"staff": "WS-02", "staff_name": "Bob", "logtype": "IN", "creation": "2024-05-01 08:00:00"})),
        ];

        let by_name = PresenceBuilder::new(today()).staff_filter(Some("alice")).build(&logs, &HashMap::new());
        assert_eq!(by_name.entries.len(), 1);
        assert_eq!(by_name.entries[0].staff_id, "WS-01");

        let by_id = PresenceBuilder::new(today()).staff_filter(Some("ws-02")).build(&logs, &HashMap::new());
        assert_eq!(by_id.entries[0].display_name, "Bob");
        assert_eq!(by_id.present_count, 1);

        let blank = PresenceBuilder::new(today()).staff_filter(Some("  ")).build(&logs, &HashMap::new());
        assert_eq!(blank.entries.len(), 2);
    }

    #[test]
    fn test_timestamps_relative_to_today() {
        let logs = vec![
            log("L1", "A", "IN", "2024-05-01 08:05:00"),
            log("L2", "B", "OUT", "2024-04-30 18:10:00"),
        ];
        let view = build(&logs);
        assert_eq!(view.entries[0].formatted_timestamp, "08:05");
        assert_eq!(view.entries[1].formatted_timestamp, "30 Apr 18:10");
    }
}
