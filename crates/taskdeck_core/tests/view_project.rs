use chrono::NaiveDate;
use taskdeck_core::{project, Filter, Priority, SortKey, Task};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn texts(view: &[Task]) -> Vec<&str> {
    view.iter().map(|task| task.text.as_str()).collect()
}

#[test]
fn project_never_mutates_its_input() {
    let tasks = vec![
        Task::new("zebra", Priority::Low, Some(date(2024, 5, 1))),
        Task::new("apple", Priority::High, None),
    ];
    let before = tasks.clone();

    let _ = project(&tasks, Filter::Active, SortKey::Name);

    assert_eq!(tasks, before);
}

#[test]
fn filter_all_is_identity_and_keeps_order() {
    let mut done = Task::new("done", Priority::Low, None);
    done.completed = true;
    let tasks = vec![Task::new("open", Priority::Low, None), done];

    let view = project(&tasks, Filter::All, SortKey::Priority);
    assert_eq!(texts(&view), vec!["open", "done"]);
}

#[test]
fn filter_active_and_completed_partition_the_list() {
    let mut done = Task::new("done", Priority::Low, None);
    done.completed = true;
    let tasks = vec![Task::new("open", Priority::Low, None), done];

    let active = project(&tasks, Filter::Active, SortKey::Priority);
    assert_eq!(texts(&active), vec!["open"]);

    let completed = project(&tasks, Filter::Completed, SortKey::Priority);
    assert_eq!(texts(&completed), vec!["done"]);
}

#[test]
fn priority_sort_is_stable_for_equal_ranks() {
    let tasks = vec![
        Task::new("first low", Priority::Low, None),
        Task::new("high", Priority::High, None),
        Task::new("second low", Priority::Low, None),
    ];

    let view = project(&tasks, Filter::All, SortKey::Priority);
    assert_eq!(texts(&view), vec!["high", "first low", "second low"]);
}

#[test]
fn date_sort_puts_all_dateless_tasks_last() {
    let tasks = vec![
        Task::new("no date a", Priority::Low, None),
        Task::new("late", Priority::Low, Some(date(2024, 6, 1))),
        Task::new("no date b", Priority::Low, None),
        Task::new("early", Priority::Low, Some(date(2024, 1, 1))),
    ];

    let view = project(&tasks, Filter::All, SortKey::Date);
    assert_eq!(texts(&view), vec!["early", "late", "no date a", "no date b"]);
}

#[test]
fn name_sort_orders_case_insensitively() {
    let tasks = vec![
        Task::new("banana", Priority::Low, None),
        Task::new("Apple", Priority::Low, None),
        Task::new("cherry", Priority::Low, None),
    ];

    let view = project(&tasks, Filter::All, SortKey::Name);
    assert_eq!(texts(&view), vec!["Apple", "banana", "cherry"]);
}

#[test]
fn milk_and_rent_scenario_sorts_both_ways() {
    let tasks = vec![
        Task::new("Buy milk", Priority::High, None),
        Task::new("Pay rent", Priority::Low, Some(date(2024, 1, 1))),
    ];

    let by_priority = project(&tasks, Filter::All, SortKey::Priority);
    assert_eq!(texts(&by_priority), vec!["Buy milk", "Pay rent"]);

    let by_date = project(&tasks, Filter::All, SortKey::Date);
    assert_eq!(texts(&by_date), vec!["Pay rent", "Buy milk"]);
}

#[test]
fn completed_filter_after_toggle_shows_exactly_the_toggled_task() {
    let mut milk = Task::new("Buy milk", Priority::High, None);
    milk.completed = true;
    let tasks = vec![milk, Task::new("Pay rent", Priority::Low, None)];

    let view = project(&tasks, Filter::Completed, SortKey::Priority);
    assert_eq!(texts(&view), vec!["Buy milk"]);
}
