//! Tag blacklist matching.

/// Return the gallery tags that appear in `blacklist`.
///
/// Matching is case-insensitive and exact (no substring matching). Tags are
/// returned in gallery order with their original spelling.
pub fn find_blacklisted<T, B>(tags: &[T], blacklist: &[B]) -> Vec<String>
where
    T: AsRef<str>,
    B: AsRef<str>,
{
    if blacklist.is_empty() {
        return Vec::new();
    }

    let blocked: Vec<String> = blacklist
        .iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect();

    tags.iter()
        .map(AsRef::as_ref)
        .filter(|tag| blocked.contains(&tag.to_lowercase()))
        .map(str::to_string)
        .collect()
}
