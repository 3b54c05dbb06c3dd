#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use dashboard_core::{Item, ItemStatus};

pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn item(id: &str, title: &str, description: &str, status: ItemStatus, created: DateTime<Utc>) -> Item {
    Item {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        created_at: created,
        updated_at: created,
    }
}

/// The eight dashboard fixtures, newest first.
pub fn seed_items() -> Vec<Item> {
    use ItemStatus::{Active, Inactive, Pending};
    vec![
        item("1", "Dashboard Implementation", "Build a comprehensive dashboard with React and TypeScript", Active, at(15, 10, 0)),
        item("2", "API Integration", "Integrate with external APIs for data fetching", Pending, at(14, 14, 30)),
        item("3", "User Authentication", "Implement secure user authentication system", Inactive, at(13, 9, 15)),
        item("4", "Database Migration", "Migrate legacy database to new schema", Active, at(12, 16, 45)),
        item("5", "Testing Framework", "Set up comprehensive testing with Jest and React Testing Library", Pending, at(11, 11, 20)),
        item("6", "Performance Optimization", "Optimize application performance and loading times", Active, at(10, 13, 10)),
        item("7", "Mobile Responsiveness", "Ensure application works perfectly on mobile devices", Inactive, at(9, 8, 30)),
        item("8", "Documentation", "Create comprehensive documentation for the project", Pending, at(8, 15, 0)),
    ]
}

pub fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}
