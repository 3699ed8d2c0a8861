//! Link construction.

/// Canonical resolver link for a DOI.
#[must_use]
pub fn doi_url(doi: &str) -> String {
    format!("https://doi.org/{}", doi.trim())
}

/// Search-engine link for a title: `{search_base}?q={encoded title}`.
#[must_use]
pub fn search_url(search_base: &str, title: &str) -> String {
    format!(
        "{}?q={}",
        search_base.trim_end_matches(['?', '/']),
        urlencoding::encode(title.trim())
    )
}
