//! Robots.txt policy wrapper
//!
//! This module provides the allow/deny check on top of the robotstxt crate.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt rules for one host
///
/// This is a wrapper around the robotstxt crate's matcher, providing a
/// simplified interface for checking whether a URL may be fetched.
#[derive(Debug, Clone, Default)]
pub struct RobotsPolicy {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Creates a permissive policy that allows everything
    ///
    /// Used when the host has no robots.txt (404) or an empty one.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns true if this policy carries no rules
    pub fn is_allow_all(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The user agent string
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_allow_all() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}
