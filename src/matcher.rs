//! URL matchers used to route requests to spiders.

use regex::Regex;

/// Decides whether a spider is interested in a URL.
///
/// Matchers are consulted before a request is downloaded: if no registered
/// spider matches, the request is skipped without ever reaching the
/// downloader. Implementations must be stateless after construction so
/// workers can share them concurrently.
pub trait UrlMatcher: Send + Sync {
    /// Returns true if `url` is matched.
    fn matches(&self, url: &str) -> bool;
}

/// Matches a single URL by exact string equality.
pub struct ExactMatcher {
    url: String,
}

impl ExactMatcher {
    pub fn new(url: impl Into<String>) -> Self {
        ExactMatcher { url: url.into() }
    }
}

impl UrlMatcher for ExactMatcher {
    fn matches(&self, url: &str) -> bool {
        self.url == url
    }
}

/// Matches URLs against a regular expression.
pub struct RegexMatcher {
    pattern: Regex,
}

impl RegexMatcher {
    /// Compiles `pattern`; fails if it is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(RegexMatcher {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl UrlMatcher for RegexMatcher {
    fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_matcher_requires_equality() {
        let m = ExactMatcher::new("http://example.com/a");
        assert!(m.matches("http://example.com/a"));
        assert!(!m.matches("http://example.com/a/b"));
        assert!(!m.matches("http://example.com/"));
    }

    #[test]
    fn regex_matcher_matches_anywhere() {
        let m = RegexMatcher::new(r"example\.com/articles/\d+").unwrap();
        assert!(m.matches("http://example.com/articles/42"));
        assert!(!m.matches("http://example.com/about"));
    }

    #[test]
    fn regex_matcher_rejects_bad_pattern() {
        assert!(RegexMatcher::new("(").is_err());
    }
}
