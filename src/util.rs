/// Format a unix timestamp for report headers.
pub fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Quote a title for display, flattening newlines so report rows stay on
/// one line.
pub fn display_title(title: &str) -> String {
    let flat: String = title
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("\"{flat}\"")
}
