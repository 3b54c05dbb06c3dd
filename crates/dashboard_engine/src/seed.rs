use chrono::{DateTime, TimeZone, Utc};
use dashboard_core::{Item, ItemStatus};

struct SeedRow {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    status: ItemStatus,
    created: (u32, u32, u32),
}

const SEED: [SeedRow; 8] = [
    SeedRow {
        id: "1",
        title: "Dashboard Implementation",
        description: "Build a comprehensive dashboard with React and TypeScript",
        status: ItemStatus::Active,
        created: (15, 10, 0),
    },
    SeedRow {
        id: "2",
        title: "API Integration",
        description: "Integrate with external APIs for data fetching",
        status: ItemStatus::Pending,
        created: (14, 14, 30),
    },
    SeedRow {
        id: "3",
        title: "User Authentication",
        description: "Implement secure user authentication system",
        status: ItemStatus::Inactive,
        created: (13, 9, 15),
    },
    SeedRow {
        id: "4",
        title: "Database Migration",
        description: "Migrate legacy database to new schema",
        status: ItemStatus::Active,
        created: (12, 16, 45),
    },
    SeedRow {
        id: "5",
        title: "Testing Framework",
        description: "Set up comprehensive testing with Jest and React Testing Library",
        status: ItemStatus::Pending,
        created: (11, 11, 20),
    },
    SeedRow {
        id: "6",
        title: "Performance Optimization",
        description: "Optimize application performance and loading times",
        status: ItemStatus::Active,
        created: (10, 13, 10),
    },
    SeedRow {
        id: "7",
        title: "Mobile Responsiveness",
        description: "Ensure application works perfectly on mobile devices",
        status: ItemStatus::Inactive,
        created: (9, 8, 30),
    },
    SeedRow {
        id: "8",
        title: "Documentation",
        description: "Create comprehensive documentation for the project",
        status: ItemStatus::Pending,
        created: (8, 15, 0),
    },
];

/// The items a fresh store starts with, newest first.
pub fn seed_items() -> Vec<Item> {
    SEED.iter()
        .map(|row| {
            let created = january_2024(row.created);
            Item {
                id: row.id.to_string(),
                title: row.title.to_string(),
                description: row.description.to_string(),
                status: row.status,
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
}

fn january_2024((day, hour, minute): (u32, u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
