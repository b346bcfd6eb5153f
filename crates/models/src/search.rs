/// Case-insensitive substring search across an entity's configured fields.
///
/// The backend applies the same filter server-side via `?s=term`; this local
/// copy drives the in-memory projections.
pub trait Searchable {
    fn search_haystack(&self) -> Vec<&str>;

    fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.search_haystack()
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Retains the items matching `term`, preserving order.
pub fn filter<T: Searchable + Clone>(items: &[T], term: &str) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.matches(term))
        .cloned()
        .collect()
}
