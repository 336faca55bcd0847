use std::collections::HashSet;
use url::Url;

/// Marker that keeps a query string alive through normalization
const HTML_MARKER: &str = ".html";

/// Normalizes a raw link found on a page into an absolute URL
///
/// # Normalization Steps
///
/// 1. Skip empty links and fragment-only links (`#section`)
/// 2. Resolve the link against `base`; skip it if that fails
/// 3. Remove the fragment
/// 4. Remove the query string unless both the raw link (without its
///    fragment) and the resolved URL contain `.html`, so cache-busting
///    parameters on images and scripts collapse to one URL
///
/// Malformed links are expected in real pages, so every failure is a skip
/// rather than an error. The result is a fixed point: normalizing it again
/// against the same base returns it unchanged.
///
/// # Examples
///
/// ```
/// use site_mirror::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// assert_eq!(
///     normalize(&base, "img/logo.png?v=3#top").as_deref(),
///     Some("https://example.com/docs/img/logo.png")
/// );
/// assert_eq!(normalize(&base, "#top"), None);
/// ```
pub fn normalize(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let mut url = base.join(raw).ok()?;
    url.set_fragment(None);

    let link = raw.split('#').next().unwrap_or(raw);
    let keeps_query = link.contains(HTML_MARKER) && url.as_str().contains(HTML_MARKER);
    if url.query().is_some() && !keeps_query {
        url.set_query(None);
    }

    Some(url.into())
}

/// Removes duplicate and empty URLs, preserving first-seen order
pub fn unique(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| !url.is_empty() && seen.insert(url.clone()))
        .collect()
}
