//! Summary-line enforcement and the final release message.

/// Maximum first-line length for commit messages.
pub const SUMMARY_LIMIT: usize = 72;

/// Timestamp layout used in the release trailer.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cap the first line of `message` at `limit` characters.
///
/// When the first line already fits, the input is returned unchanged. Otherwise
/// the line is cut at the last space inside the limit (or hard-cut when the
/// prefix has no usable space). Lines after the first are preserved as-is.
pub fn enforce_summary_limit(message: &str, limit: usize) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return message.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    let first = lines[0];
    if first.chars().count() <= limit {
        return message.to_string();
    }

    let summary = cut_at_word_boundary(first, limit);
    lines[0] = &summary;
    lines.join("\n")
}

/// Truncate `line` to at most `limit` characters, preferring a word boundary.
fn cut_at_word_boundary(line: &str, limit: usize) -> String {
    let byte_end = line
        .char_indices()
        .nth(limit)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len());
    let hard_cut = &line[..byte_end];

    // The cut already sits on a boundary when the next character is a space.
    if line[byte_end..].starts_with(char::is_whitespace) {
        return hard_cut.trim_end().to_string();
    }

    match hard_cut.rfind(' ') {
        Some(pos) => {
            let soft_cut = hard_cut[..pos].trim_end();
            if soft_cut.is_empty() {
                hard_cut.to_string()
            } else {
                soft_cut.to_string()
            }
        }
        None => hard_cut.to_string(),
    }
}

/// Build the commit and tag message with the `Version:`/`Timestamp:` trailer.
pub fn release_message(message: &str, tag: &str, timestamp: &str) -> String {
    format!(
        "{}\n\nVersion: {}\nTimestamp: {}\n",
        message.trim_end(),
        tag,
        timestamp
    )
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn release_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
