//! Pulls the candidate statement out of raw model output
//!
//! Recognized wrappers are `<SQL>`…`</SQL>` (case-insensitive) and Markdown code fences with an
//! optional `sql`/`mysql` language tag. The text between the first opening marker and the first
//! closing marker after it is kept; without a closing marker the rest of the text is kept, and a
//! lone `</SQL>` keeps what precedes it. Output without any wrapper is returned trimmed.
//!
//! A fence only counts at the start of a line, and a closing fence must start or end its line,
//! so backticks inside a string literal stay part of the statement. Once the outer wrapper is
//! removed, only wrappers that open the remaining text are peeled; the statement body is never
//! scanned again.

const SQL_OPEN: &str = "<sql>";
const SQL_CLOSE: &str = "</sql>";
const FENCE: &str = "```";
const LANGUAGE_TAGS: &[&str] = &["", "sql", "mysql"];

pub fn extract_sql(raw: &str) -> String {
    let mut sql = unwrap_outer(raw.trim());

    while let Some(inner) = unwrap_leading(&sql) {
        sql = inner;
    }

    sql
}

fn unwrap_outer(text: &str) -> String {
    let lowered = text.to_ascii_lowercase();

    if let Some(open) = lowered.find(SQL_OPEN) {
        return unwrap_tag(text, &lowered, open);
    }

    if let Some(close) = lowered.find(SQL_CLOSE) {
        return text[..close].trim().to_string();
    }

    if let Some(open) = find_open_fence(text) {
        return unwrap_fence(text, open);
    }

    text.to_string()
}

/// Peels a wrapper nested directly inside the outer one, e.g. a fence inside `<SQL>` tags
fn unwrap_leading(text: &str) -> Option<String> {
    let lowered = text.to_ascii_lowercase();

    if lowered.starts_with(SQL_OPEN) {
        Some(unwrap_tag(text, &lowered, 0))
    } else if text.starts_with(FENCE) {
        Some(unwrap_fence(text, 0))
    } else {
        None
    }
}

fn unwrap_tag(text: &str, lowered: &str, open: usize) -> String {
    let start = open + SQL_OPEN.len();
    let body = match lowered[start..].find(SQL_CLOSE) {
        Some(close) => &text[start..start + close],
        None => &text[start..],
    };
    body.trim().to_string()
}

fn unwrap_fence(text: &str, open: usize) -> String {
    let after = skip_language_tag(&text[open + FENCE.len()..]);
    let body = match find_close_fence(after) {
        Some(close) => &after[..close],
        None => after,
    };
    body.trim().to_string()
}

fn find_open_fence(text: &str) -> Option<usize> {
    text.match_indices(FENCE)
        .map(|(i, _)| i)
        .find(|&i| starts_line(text, i))
}

fn find_close_fence(text: &str) -> Option<usize> {
    text.match_indices(FENCE)
        .map(|(i, _)| i)
        .find(|&i| starts_line(text, i) || ends_line(text, i + FENCE.len()))
}

fn starts_line(text: &str, at: usize) -> bool {
    text[..at].rsplit('\n').next().unwrap_or("").trim().is_empty()
}

fn ends_line(text: &str, at: usize) -> bool {
    text[at..].split('\n').next().unwrap_or("").trim().is_empty()
}

/// Drops a ```` ```sql ```` style tag when it sits alone on the fence line
fn skip_language_tag(after_fence: &str) -> &str {
    match after_fence.find('\n') {
        Some(line_end)
            if LANGUAGE_TAGS
                .iter()
                .any(|tag| after_fence[..line_end].trim().eq_ignore_ascii_case(tag)) =>
        {
            &after_fence[line_end + 1..]
        }
        _ => after_fence,
    }
}
