use chrono::{NaiveDate, TimeZone, Utc};
use taskdeck_core::{Priority, Task};

#[test]
fn task_new_sets_defaults() {
    let task = Task::new("buy milk", Priority::High, None);

    assert!(!task.id.is_nil());
    assert_eq!(task.text, "buy milk");
    assert!(!task.completed);
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.due_date, None);
}

#[test]
fn priority_rank_orders_high_before_low() {
    assert!(Priority::High.rank() < Priority::Medium.rank());
    assert!(Priority::Medium.rank() < Priority::Low.rank());
    assert_eq!(Priority::default(), Priority::Low);
}

#[test]
fn task_serialization_uses_expected_wire_fields() {
    let due = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let task = Task::new("pay rent", Priority::Low, Some(due));

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], task.id.to_string());
    assert_eq!(json["text"], "pay rent");
    assert_eq!(json["completed"], false);
    assert_eq!(json["priority"], "low");
    assert_eq!(json["due_date"], "2024-01-01");
    // created is RFC 3339; the exact instant is not asserted.
    assert!(json["created"].as_str().unwrap().contains('T'));

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn dateless_task_serializes_null_due_date() {
    let task = Task::new("no deadline", Priority::Medium, None);
    let json = serde_json::to_value(&task).unwrap();
    assert!(json["due_date"].is_null());
}

#[test]
fn is_overdue_compares_start_of_day_against_now() {
    let due = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let task = Task::new("dated", Priority::Low, Some(due));

    let before = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
    assert!(!task.is_overdue(before));
    assert!(task.is_overdue(after));

    let dateless = Task::new("dateless", Priority::Low, None);
    assert!(!dateless.is_overdue(after));
}
