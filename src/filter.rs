/// Narrow `items` to the entries containing `query`, ignoring case.
///
/// An empty query keeps every entry. Matches keep their original order.
pub fn filter_items(items: &[String], query: &str) -> Vec<String> {
    if query.is_empty() {
        return items.to_vec();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// The canonical instance id of a host entry such as `i-123 (web-server)`.
pub fn extract_id(entry: &str) -> &str {
    entry.split(' ').next().unwrap_or(entry)
}
