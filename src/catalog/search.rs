use crate::models::BookRecord;

/// Visible text of a row: the five cells joined by single spaces.
pub fn row_text(record: &BookRecord) -> String {
    record.cells().join(" ")
}

/// Whether a row stays visible for the given search query. Matching is a
/// case-insensitive substring test over the row text; an empty query keeps
/// every row.
pub fn matches_query(record: &BookRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    fold_case(&row_text(record)).contains(&fold_case(query))
}

/// Lowercase one character at a time. `str::to_lowercase` maps a capital
/// sigma by word position, so a prefix could fold differently from the text
/// it came from.
pub(crate) fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}
