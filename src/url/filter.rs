use crate::url::host_key;
use url::Url;

/// Decides whether a discovered URL is worth enqueuing at all
///
/// The filter is built once per run from the seed URL and shared by every
/// worker. A candidate is rejected when:
///
/// 1. It is empty or fragment-only (`#...`)
/// 2. Same-domain mode is on and it points at a host other than the seed's
/// 3. Its scheme is neither `http` nor `https`
/// 4. It carries a query string and does not contain `.html`, which keeps
///    the crawl away from endlessly parametrized endpoints
///
/// Relative candidates resolve against the seed and therefore always pass
/// the host check.
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    seed: Url,
    seed_host: Option<String>,
    same_domain_only: bool,
}

impl EligibilityFilter {
    /// Creates a filter anchored at the seed URL
    pub fn new(seed: &Url, same_domain_only: bool) -> Self {
        Self {
            seed: seed.clone(),
            seed_host: host_key(seed),
            same_domain_only,
        }
    }

    /// Returns true if the candidate URL should be downloaded
    ///
    /// # Examples
    ///
    /// ```
    /// use site_mirror::url::EligibilityFilter;
    /// use url::Url;
    ///
    /// let seed = Url::parse("http://a.com/").unwrap();
    /// let filter = EligibilityFilter::new(&seed, true);
    ///
    /// assert!(filter.should_download("http://a.com/page"));
    /// assert!(!filter.should_download("http://b.com/x"));
    /// ```
    pub fn should_download(&self, candidate: &str) -> bool {
        if candidate.is_empty() || candidate.starts_with('#') {
            return false;
        }

        let parsed = match self.seed.join(candidate) {
            Ok(url) => url,
            Err(_) => return false,
        };

        if self.same_domain_only && host_key(&parsed) != self.seed_host {
            return false;
        }

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return false;
        }

        if candidate.contains('?') && !candidate.contains(".html") {
            return false;
        }

        true
    }

    /// Returns the host key of the seed URL
    pub fn seed_host(&self) -> Option<&str> {
        self.seed_host.as_deref()
    }
}
