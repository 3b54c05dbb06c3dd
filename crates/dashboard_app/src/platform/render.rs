use chrono::{DateTime, Utc};
use dashboard_core::{AppViewModel, Item, ItemRowView, ItemStatus, ListView, PaginationView};

/// Renders the whole screen as plain text lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(header(view));

    if let Some(banner) = &view.error_banner {
        let actions = if view.error_retries_request {
            "dismiss | retry"
        } else {
            "dismiss"
        };
        lines.push(format!("! {banner}  ({actions})"));
    }

    match &view.list {
        ListView::Loading => lines.push("Loading items...".to_string()),
        ListView::Failed { message } => {
            lines.push(format!("Error: {message}"));
            if view.error_retries_request {
                lines.push("Type `retry` to try again.".to_string());
            } else {
                lines.push("Type `retry` to reload the list.".to_string());
            }
        }
        ListView::NoMatches => {
            lines.push("No items match your filters. Type `clear-all` to reset them.".to_string())
        }
        ListView::NoItems => lines.push("No items yet. Use `add` to create one.".to_string()),
        ListView::Items(rows) => {
            for row in rows {
                lines.extend(item_row(row));
            }
        }
    }

    if let Some(pagination) = &view.pagination {
        lines.extend(pagination_lines(pagination));
    }

    if let Some(errors) = &view.form_errors {
        lines.push("Cannot create item:".to_string());
        for field in &errors.fields {
            lines.push(format!("  - {field}"));
        }
    }

    if let Some(item) = &view.selected_item {
        lines.extend(details(item));
    }

    lines
}

fn header(view: &AppViewModel) -> String {
    let mut header = format!("Items ({})", view.total);
    if !view.filters.search.is_empty() {
        header.push_str(&format!("  search: {:?}", view.filters.search));
    }
    if view.search_input != view.filters.search {
        header.push_str(&format!("  typing: {:?}", view.search_input));
    }
    header.push_str(&format!("  status: {}", view.filters.status));
    if view.loading {
        header.push_str("  [loading]");
    }
    header
}

fn item_row(row: &ItemRowView) -> [String; 2] {
    [
        format!(
            "{:>4}  {:<32} {:<10} {}",
            row.id,
            row.title,
            badge(row.status),
            format_date(&row.created_at)
        ),
        format!("      {}", row.description),
    ]
}

fn pagination_lines(pagination: &PaginationView) -> [String; 2] {
    let numbers = pagination
        .page_numbers
        .iter()
        .map(|&number| {
            if number == pagination.page {
                format!("[{number}]")
            } else {
                number.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let back = if pagination.can_go_back { "<" } else { " " };
    let forward = if pagination.can_go_forward { ">" } else { " " };
    [
        format!(
            "Showing {}-{} of {} items",
            pagination.showing_from, pagination.showing_to, pagination.total
        ),
        format!("{back} {numbers} {forward}  (page {} of {})", pagination.page, pagination.total_pages),
    ]
}

fn details(item: &Item) -> Vec<String> {
    vec![
        format!("== Item {} ==", item.id),
        format!("Title:       {}", item.title),
        format!("Status:      {}", badge(item.status)),
        format!("Description: {}", item.description),
        format!("Created:     {}", format_date(&item.created_at)),
        format!("Updated:     {}", format_date(&item.updated_at)),
        "(close to return)".to_string(),
    ]
}

fn badge(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Active => "Active",
        ItemStatus::Inactive => "Inactive",
        ItemStatus::Pending => "Pending",
    }
}

/// "Jan 15, 2024"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
