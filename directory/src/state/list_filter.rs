use directory_api::endpoints::businesses::Business;

/// Derives the visible subset of `collection`.
///
/// A non-empty `search` keeps records where name, field of work, city or notes
/// contains it, ignoring case. A non-empty `category` keeps records whose field
/// of work equals it exactly. Both apply when both are set; order is kept.
pub fn apply<'a, I>(collection: I, search: &str, category: &str) -> Vec<&'a Business>
where
    I: IntoIterator<Item = &'a Business>,
{
    let needle = search.to_lowercase();

    collection
        .into_iter()
        .filter(|b| category.is_empty() || b.field_of_work == category)
        .filter(|b| needle.is_empty() || matches_search(b, &needle))
        .collect()
}

fn matches_search(business: &Business, needle: &str) -> bool {
    [
        &business.name,
        &business.field_of_work,
        &business.city,
        &business.notes,
    ]
    .iter()
    .any(|value| value.to_lowercase().contains(needle))
}
