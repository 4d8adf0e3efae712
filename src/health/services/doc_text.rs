//! Trimming of fetched documentation text.

/// Maximum number of lines kept per documentation field
pub const MAX_DOC_LINES: usize = 200;

/// Lines of context kept on each side of a query hit
pub const CONTEXT_LINES: usize = 3;

const GAP_MARKER: &str = "...";

/// Truncates text to [`MAX_DOC_LINES`] lines, appending a marker when cut
pub fn truncate(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= MAX_DOC_LINES {
        return text.to_string();
    }

    let omitted = lines.len() - MAX_DOC_LINES;
    let mut out = lines[..MAX_DOC_LINES].join("\n");
    out.push_str(&format!("\n\n... (truncated, {} more lines)", omitted));
    out
}

/// Keeps only lines within [`CONTEXT_LINES`] of a line mentioning any query
/// keyword (case-insensitive). Returns `None` when nothing matches.
pub fn filter_by_query(text: &str, query: &str) -> Option<String> {
    let keywords: Vec<String> = query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if keywords.is_empty() {
        return None;
    }

    let lines: Vec<&str> = text.lines().collect();
    let mut keep = vec![false; lines.len()];
    let mut matched = false;

    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if keywords.iter().any(|k| lower.contains(k.as_str())) {
            matched = true;
            let start = i.saturating_sub(CONTEXT_LINES);
            let end = (i + CONTEXT_LINES).min(lines.len() - 1);
            keep[start..=end].iter_mut().for_each(|k| *k = true);
        }
    }

    if !matched {
        return None;
    }

    let mut out: Vec<&str> = Vec::new();
    let mut previous: Option<usize> = None;
    for (i, line) in lines.iter().enumerate().filter(|(i, _)| keep[*i]) {
        if previous.is_some_and(|p| p + 1 != i) {
            out.push(GAP_MARKER);
        }
        out.push(line);
        previous = Some(i);
    }
    Some(out.join("\n"))
}

/// Applies query filtering then truncation.
///
/// A query with no hits yields the full, untruncated text so the caller
/// never loses content to an overly narrow query.
pub fn prepare(text: &str, query: Option<&str>) -> String {
    match query {
        Some(q) => match filter_by_query(text, q) {
            Some(filtered) => truncate(&filtered),
            None => text.to_string(),
        },
        None => truncate(text),
    }
}
