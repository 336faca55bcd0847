//! Link and resource extraction from fetched documents
//!
//! This module turns raw HTML (or CSS) bytes into two lists:
//! - Links to follow (navigational `<a>` and `<area>` tags)
//! - Resources to fetch without recursing (stylesheets, scripts, media, ...)
//!
//! Both lists come back normalized and deduplicated.

use crate::url::{normalize, unique};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static CSS_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*["']?([^"')]+)["']?\s*\)"#).expect("hardcoded regex pattern is valid")
});

/// Tags whose target is navigated to
const LINK_RULES: &[(&str, &str)] = &[("a[href]", "href"), ("area[href]", "href")];

/// Tags whose target is embedded in the page
///
/// `link[href]` covers stylesheets and icons alike.
const RESOURCE_RULES: &[(&str, &str)] = &[
    ("link[href]", "href"),
    ("script[src]", "src"),
    ("img[src]", "src"),
    ("source[src]", "src"),
    ("video[src]", "src"),
    ("audio[src]", "src"),
    ("iframe[src]", "src"),
    ("embed[src]", "src"),
    ("object[data]", "data"),
];

/// URLs discovered in one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Navigable links, enqueued one level deeper
    pub links: Vec<String>,

    /// Embedded resources, enqueued at the page's own depth
    pub resources: Vec<String>,
}

/// Pluggable extraction capability used by the crawl workers
pub trait ContentExtractor: Send + Sync {
    /// Extracts links and resources from a fetched HTML document
    ///
    /// Never fails: markup that does not match simply yields nothing, and a
    /// candidate that cannot be normalized is dropped on its own.
    fn extract(&self, base_url: &Url, content: &[u8]) -> Extracted;
}

/// One tag/attribute pair to pull URLs from
#[derive(Debug)]
struct AttributeRule {
    selector: Selector,
    attribute: String,
}

impl AttributeRule {
    fn parse(css: &str, attribute: &str) -> Result<Self, String> {
        let selector = Selector::parse(css).map_err(|e| format!("Invalid selector '{}': {}", css, e))?;
        Ok(Self {
            selector,
            attribute: attribute.to_string(),
        })
    }
}

/// Default extractor for HTML documents
///
/// Resource rules are extensible through [`HtmlExtractor::with_resource_rule`].
#[derive(Debug)]
pub struct HtmlExtractor {
    link_rules: Vec<AttributeRule>,
    resource_rules: Vec<AttributeRule>,
    srcset: Selector,
}

impl HtmlExtractor {
    /// Creates an extractor with the default tag tables
    pub fn new() -> Self {
        Self {
            link_rules: build_rules(LINK_RULES),
            resource_rules: build_rules(RESOURCE_RULES),
            srcset: Selector::parse("[srcset]").expect("hardcoded selector is valid"),
        }
    }

    /// Adds a resource tag/attribute pair on top of the defaults
    ///
    /// # Example
    ///
    /// ```
    /// use site_mirror::crawler::HtmlExtractor;
    ///
    /// let extractor = HtmlExtractor::new()
    ///     .with_resource_rule("video[poster]", "poster")
    ///     .unwrap();
    /// ```
    pub fn with_resource_rule(mut self, css: &str, attribute: &str) -> Result<Self, String> {
        self.resource_rules.push(AttributeRule::parse(css, attribute)?);
        Ok(self)
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for HtmlExtractor {
    fn extract(&self, base_url: &Url, content: &[u8]) -> Extracted {
        let text = String::from_utf8_lossy(content);
        let document = Html::parse_document(&text);

        let links = collect_attributes(&document, &self.link_rules, base_url);
        let mut resources = collect_attributes(&document, &self.resource_rules, base_url);

        for element in document.select(&self.srcset) {
            if let Some(value) = element.value().attr("srcset") {
                resources.extend(parse_srcset(base_url, value));
            }
        }

        // Second pass over the raw text catches inline <style> blocks and style attributes
        resources.extend(scan_css_urls(base_url, &text));

        Extracted {
            links: unique(links),
            resources: unique(resources),
        }
    }
}

/// Extracts `url(...)` references from a stylesheet
///
/// `data:` URIs are skipped; the result is normalized and deduplicated.
pub fn extract_css_urls(base_url: &Url, content: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(content);
    unique(scan_css_urls(base_url, &text))
}

fn build_rules(table: &[(&str, &str)]) -> Vec<AttributeRule> {
    table
        .iter()
        .map(|(css, attribute)| {
            AttributeRule::parse(css, attribute).expect("hardcoded selector is valid")
        })
        .collect()
}

fn collect_attributes(document: &Html, rules: &[AttributeRule], base_url: &Url) -> Vec<String> {
    let mut urls = Vec::new();

    for rule in rules {
        for element in document.select(&rule.selector) {
            if let Some(value) = element.value().attr(&rule.attribute) {
                if let Some(absolute_url) = normalize(base_url, value) {
                    urls.push(absolute_url);
                }
            }
        }
    }

    urls
}

/// Splits a `srcset` value into its candidate URLs
///
/// Each comma-separated candidate contributes the part before its first
/// whitespace (the descriptor such as `2x` or `480w` is dropped).
fn parse_srcset(base_url: &Url, srcset: &str) -> Vec<String> {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .filter_map(|url_part| normalize(base_url, url_part))
        .collect()
}

fn scan_css_urls(base_url: &Url, text: &str) -> Vec<String> {
    CSS_URL_PATTERN
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .filter(|css_url| !css_url.starts_with("data:"))
        .filter_map(|css_url| normalize(base_url, css_url))
        .collect()
}
