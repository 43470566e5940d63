#[cfg(test)]
mod tests {
    use serde_json::json;
    use wadash::libs::records::{
        decode_records, parse_datetime, parse_linked_logs, AttendanceLogRecord, DailyWorkingHoursRecord, LogType,
        VerificationStatus,
    };

    #[test]
    fn test_decode_full_attendance_log() {
        let raw = vec![json!({
            "name": "LOG-0001",
            "staff": "WS-01",
            "staff_name": "Alice",
            "logtype": "IN",
            "selfie": "/files/selfie.jpg",
            "creation": "2024-05-01 08:58:12.123456",
            "verification_status": "Success",
            "face_distance": 0.31,
            "work_hours": null,
            "location": null,
            "is_near_warehouse": 1
        })];

        let (records, errors) = decode_records::<AttendanceLogRecord>(raw);
        assert!(errors.is_empty());
        let log = &records[0];
        assert_eq!(log.staff, "WS-01");
        assert_eq!(log.display_name(), "Alice");
        assert_eq!(log.logtype, LogType::In);
        assert_eq!(log.verification_status, VerificationStatus::Success);
        assert_eq!(log.face_distance, Some(0.31));
        assert!(log.is_near_warehouse);
        assert_eq!(log.selfie.as_deref(), Some("/files/selfie.jpg"));
    }

    #[test]
    fn test_decode_lenient_attendance_fields() {
        let raw = vec![json!({
            "staff": "WS-02",
            "staff_name": "",
            "logtype": "out",
            "creation": "2024-05-01T17:02",
            "verification_status": "something-new",
            "work_hours": "7.75",
            "is_near_warehouse": "0"
        })];

        let (records, errors) = decode_records::<AttendanceLogRecord>(raw);
        assert!(errors.is_empty());
        let log = &records[0];
        assert_eq!(log.display_name(), "WS-02");
        assert_eq!(log.logtype, LogType::Out);
        assert_eq!(log.verification_status, VerificationStatus::Pending);
        assert_eq!(log.work_hours, Some(7.75));
        assert!(!log.is_near_warehouse);
        assert!(log.name.is_empty());
    }

    #[test]
    fn test_invalid_records_are_reported_not_fatal() {
        let raw = vec![
            json!({"staff": "WS-01", "logtype": "IN", "creation": "2024-05-01 08:00:00"}),
            json!({"staff": "WS-02", "logtype": "SIDEWAYS", "creation": "2024-05-01 08:00:00"}),
            json!({"logtype": "IN", "creation": "2024-05-01 08:00:00"}),
            json!({"staff": "WS-04", "logtype": "OUT", "creation": "yesterday"}),
            json!({"staff": "WS-05", "logtype": "OUT", "creation": "2024-05-01 18:00:00"}),
        ];

        let (records, errors) = decode_records::<AttendanceLogRecord>(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].staff, "WS-01");
        assert_eq!(records[1].staff, "WS-05");
        assert_eq!(errors.iter().map(|e| e.index).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(errors.iter().all(|e| e.doctype == "Warehouse Attendance Log"));
    }

    #[test]
    fn test_decode_daily_working_hours() {
        let raw = vec![
            json!({
                "name": "DWH-0001",
                "employee": "WS-01",
                "employee_name": "Alice",
                "working_hours": 5.12,
                "attendance_log": "[\"LOG-0001\", \"LOG-0002\"]",
                "date": "2024-05-01"
            }),
            json!({"name": "DWH-0002", "employee": "WS-02", "working_hours": "n/a", "attendance_log": "not json"}),
        ];

        let (records, errors) = decode_records::<DailyWorkingHoursRecord>(raw);
        assert!(errors.is_empty());
        assert_eq!(records[0].attendance_log, vec!["LOG-0001", "LOG-0002"]);
        assert_eq!(records[0].hours(), 5.12);
        assert_eq!(records[0].date, chrono::NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(records[1].display_name(), "WS-02");
        assert_eq!(records[1].working_hours, None);
        assert_eq!(records[1].hours(), 0.0);
        assert!(records[1].attendance_log.is_empty());
    }

    #[test]
    fn test_parse_linked_logs_shapes() {
        assert_eq!(parse_linked_logs(&json!(["a", "b"])), vec!["a", "b"]);
        assert_eq!(parse_linked_logs(&json!("[\"a\"]")), vec!["a"]);
        assert_eq!(parse_linked_logs(&json!([1, 2])), vec!["1", "2"]);
        assert!(parse_linked_logs(&json!("")).is_empty());
        assert!(parse_linked_logs(&json!({"a": 1})).is_empty());
        assert!(parse_linked_logs(&json!(null)).is_empty());
    }

    #[test]
    fn test_parse_datetime_layouts() {
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2024-05-01 09:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-05-01T09:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-05-01 09:30"), Some(expected));
        assert_eq!(parse_datetime(" 2024-05-01 09:30:00.000000 "), Some(expected));
        assert_eq!(parse_datetime("01/05/2024"), None);
    }
}
