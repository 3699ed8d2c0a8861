//! Link predicates.

/// Whether `value` is a usable web link: an `http://` or `https://` scheme
/// (case-insensitive) followed by at least one more character.
#[must_use]
pub fn is_web_link(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"].iter().any(|scheme| {
        value.len() > scheme.len()
            && value
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Whether `value` looks like a bare DOI (`10.<registrant>/<suffix>`).
#[must_use]
pub fn is_doi(value: &str) -> bool {
    let value = value.trim();
    value
        .strip_prefix("10.")
        .and_then(|rest| rest.split_once('/'))
        .is_some_and(|(registrant, suffix)| !registrant.is_empty() && !suffix.is_empty())
}
