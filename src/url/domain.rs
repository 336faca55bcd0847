use url::Url;

/// Returns the host key of a URL: the lowercase host plus any non-default port
///
/// The key names the per-host directory in the mirror tree and is what the
/// same-domain filter compares, so `http://a.com:8080/` and `http://a.com/`
/// are different hosts.
///
/// # Returns
///
/// * `Some(String)` - `host` or `host:port`
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::host_key;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(host_key(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_key(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
