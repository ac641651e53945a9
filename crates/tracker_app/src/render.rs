use tracker_core::{
    FilterPredicate, JobRowView, JobStats, NotificationView, Severity, TrackerViewModel,
};

pub const DEGRADED_BANNER: &str =
    "Using mock data: could not connect to the backend API. Type `retry` to reconnect.";
const EMPTY_LIST: &str = "No job applications found";
const NOTES_WIDTH: usize = 48;

/// Full screen: banner, notification, stats header and the filtered list.
pub fn render(view: &TrackerViewModel) -> Vec<String> {
    let mut lines = render_status(view);
    lines.push(stats_line(&view.stats));
    lines.push(String::new());
    lines.extend(render_list(view));
    lines
}

/// Banner and notification only; printed after commands that change state.
pub fn render_status(view: &TrackerViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if view.degraded {
        lines.push(format!("[!] {DEGRADED_BANNER}"));
    }
    if let Some(notification) = &view.notification {
        lines.push(notification_line(notification));
    }
    if view.loading {
        lines.push("Loading...".to_string());
    }
    lines
}

pub fn render_list(view: &TrackerViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if !view.predicate.is_unrestricted() {
        lines.push(format!(
            "Filter: {} ({} of {} shown)",
            describe_predicate(&view.predicate),
            view.jobs.len(),
            view.total_jobs
        ));
    }
    if view.jobs.is_empty() {
        lines.push(EMPTY_LIST.to_string());
        return lines;
    }
    for row in &view.jobs {
        lines.extend(row_lines(row));
    }
    lines
}

pub fn render_stats(stats: &JobStats) -> Vec<String> {
    let mut lines = vec![format!("Total Applications: {}", stats.total)];
    for (title, count) in [
        ("Applied", stats.applied),
        ("Interviews", stats.interview),
        ("Offers", stats.offer),
        ("Rejections", stats.rejected),
    ] {
        lines.push(format!(
            "{title:<11} {count:>4}  ({}%)",
            stats.percentage(count)
        ));
    }
    lines
}

fn stats_line(stats: &JobStats) -> String {
    format!(
        "Total: {} | Interviews: {} | Offers: {} | Rejections: {}",
        stats.total, stats.interview, stats.offer, stats.rejected
    )
}

fn notification_line(notification: &NotificationView) -> String {
    let tag = match notification.severity {
        Severity::Success => "ok",
        Severity::Warning => "warn",
        Severity::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}

fn row_lines(row: &JobRowView) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<10} {:<24} {:<24} {:<10} {}",
        row.id.as_str(),
        row.company,
        row.role,
        row.status.label(),
        row.date_label
    )];
    if let Some(link) = &row.link {
        lines.push(format!("{:<10} {link}", ""));
    }
    if let Some(notes) = &row.notes {
        lines.push(format!("{:<10} {}", "", truncate(notes, NOTES_WIDTH)));
    }
    lines
}

fn describe_predicate(predicate: &FilterPredicate) -> String {
    let mut parts = Vec::new();
    if !predicate.statuses.is_empty() {
        let labels: Vec<&str> = predicate.statuses.iter().map(|s| s.label()).collect();
        parts.push(format!("status {}", labels.join("/")));
    }
    let range = predicate.date_range;
    match (range.start, range.end) {
        (Some(start), Some(end)) => parts.push(format!(
            "applied {} to {}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )),
        (Some(start), None) => parts.push(format!("applied from {}", start.format("%Y-%m-%d"))),
        (None, Some(end)) => parts.push(format!("applied until {}", end.format("%Y-%m-%d"))),
        (None, None) => {}
    }
    parts.join(", ")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
