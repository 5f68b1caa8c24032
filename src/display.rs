//! Plain-text rendering of account snapshots.

use chrono::{DateTime, NaiveDate};

use crate::api::types::{Dashboard, UserProfile};

const MISSING: &str = "N/A";

fn or_missing(value: &Option<String>) -> &str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING)
}

/// Format a backend due date as `YYYY-MM-DD`.
///
/// Accepts RFC 3339 timestamps and bare dates; anything else is shown as sent.
pub fn format_due_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return MISSING.to_string();
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// Full profile view.
pub fn render_profile(profile: &UserProfile) -> String {
    [
        format!("Name: {}", or_missing(&profile.name)),
        format!("Phone: {}", or_missing(&profile.phone)),
        format!("Address: {}", or_missing(&profile.address)),
        format!("Package: {}", or_missing(&profile.package_name)),
        format!("Payment Status: {}", or_missing(&profile.payment_status)),
        format!(
            "Next Payment Due: {}",
            format_due_date(profile.due_date.as_deref())
        ),
    ]
    .join("\n")
}

/// Dashboard view: account summary followed by notifications.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut lines = Vec::new();
    match &dashboard.profile {
        Some(profile) => {
            lines.push(format!("Welcome, {}!", or_missing(&profile.name)));
            lines.push(format!("Package: {}", or_missing(&profile.package_name)));
            lines.push(format!(
                "Payment Status: {}",
                or_missing(&profile.payment_status)
            ));
            lines.push(format!(
                "Next Payment Due: {}",
                format_due_date(profile.due_date.as_deref())
            ));
        }
        None => lines.push("Unable to load user data.".to_string()),
    }

    lines.push(String::new());
    lines.push("Recent Notifications".to_string());
    if dashboard.notifications.is_empty() {
        lines.push("No notifications available.".to_string());
    } else {
        lines.extend(
            dashboard
                .notifications
                .iter()
                .map(|n| format!("- {}", n.message)),
        );
    }
    lines.join("\n")
}
