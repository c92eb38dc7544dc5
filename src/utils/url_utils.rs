//! URL manipulation utilities.
//!
//! Every link that leaves the walker or the site map reader passes through
//! [`resolve_href`], so downstream stages only ever see absolute URLs.

use url::Url;

/// Resolve an `href` attribute against the site origin
///
/// Returns `None` for empty hrefs, fragment-only hrefs and non-http schemes
/// (`javascript:`, `mailto:`, `data:`), and for anything that does not
/// resolve to an absolute http(s) URL.
#[must_use]
pub fn resolve_href(origin: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") || href.starts_with("data:")
    {
        return None;
    }

    let resolved = origin.join(href).ok()?;
    if is_absolute_http_url(resolved.as_str()) {
        Some(resolved.into())
    } else {
        None
    }
}

/// Listing page `n` of a category, as `category_url?page=n`
///
/// An existing query string on the category URL is preserved.
pub fn page_url(category_url: &str, page: usize) -> Result<String, url::ParseError> {
    let mut url = Url::parse(category_url)?;
    url.query_pairs_mut()
        .append_pair("page", &page.to_string());
    Ok(url.into())
}

/// Check that a URL has an http(s) scheme, a host and a path
#[must_use]
pub fn is_absolute_http_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}
