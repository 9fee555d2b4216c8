//! Crawl-scope classification
//!
//! Decides whether a link discovered on the root page is worth following.
//! The rule only admits the root's parent page (and topic-related pages
//! when a configured keyword appears in both paths); it is not a general
//! same-section detector.

use crate::url::canonical::parse_url;
use crate::url::domain::same_host;
use crate::UrlError;
use url::Url;

/// Outcome of classifying a candidate link against the crawl root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeVerdict {
    /// Link is in scope and should be followed
    Accepted,
    /// Link points at a different host (or port)
    ForeignHost,
    /// Same host, but the path is neither the parent path nor topic-related
    OutOfScope,
    /// The root has no parent path, so nothing can be in scope
    NoParentPath,
    /// The link could not be parsed as an absolute URL
    Unparsable,
}

impl ScopeVerdict {
    /// Returns true if the link should be followed
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Short human-readable reason, used in diagnostics
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Accepted => "in scope",
            Self::ForeignHost => "different host",
            Self::OutOfScope => "not parent",
            Self::NoParentPath => "root has no parent path",
            Self::Unparsable => "unparsable",
        }
    }
}

/// Classifies discovered links relative to a fixed crawl root
#[derive(Debug, Clone)]
pub struct ScopeClassifier {
    root: Url,
    parent_path: Option<String>,
    topic_keywords: Vec<String>,
}

impl ScopeClassifier {
    /// Creates a classifier for the given root URL
    ///
    /// Empty keywords are dropped.
    pub fn new(root: Url, topic_keywords: Vec<String>) -> Self {
        let parent_path = parent_path(root.path()).map(str::to_string);
        let topic_keywords = topic_keywords
            .into_iter()
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            root,
            parent_path,
            topic_keywords,
        }
    }

    /// Parses the root URL and creates a classifier for it
    pub fn parse(root: &str, topic_keywords: Vec<String>) -> Result<Self, UrlError> {
        Ok(Self::new(parse_url(root)?, topic_keywords))
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// The root's path with its last segment removed, if it has one
    pub fn parent_path(&self) -> Option<&str> {
        self.parent_path.as_deref()
    }

    pub fn topic_keywords(&self) -> &[String] {
        &self.topic_keywords
    }

    /// Classifies a candidate link string
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_harvester::url::{ScopeClassifier, ScopeVerdict};
    ///
    /// let classifier = ScopeClassifier::parse("https://x.test/a/b/c", vec![]).unwrap();
    /// assert_eq!(classifier.classify("https://x.test/a/b"), ScopeVerdict::Accepted);
    /// assert_eq!(classifier.classify("https://x.test/a/b/c/d"), ScopeVerdict::OutOfScope);
    /// assert_eq!(classifier.classify("https://y.test/a/b"), ScopeVerdict::ForeignHost);
    /// ```
    pub fn classify(&self, candidate: &str) -> ScopeVerdict {
        match parse_url(candidate) {
            Ok(url) => self.classify_url(&url),
            Err(_) => ScopeVerdict::Unparsable,
        }
    }

    /// Classifies an already-parsed candidate URL
    pub fn classify_url(&self, candidate: &Url) -> ScopeVerdict {
        if !same_host(&self.root, candidate) {
            return ScopeVerdict::ForeignHost;
        }

        let parent = match &self.parent_path {
            Some(parent) => parent.as_str(),
            None => return ScopeVerdict::NoParentPath,
        };

        let link_path = candidate.path().trim_end_matches('/');

        tracing::trace!(
            root_path = self.root.path(),
            parent_path = parent,
            link_path,
            "classifying link"
        );

        if link_path == parent {
            return ScopeVerdict::Accepted;
        }

        if self.shares_topic(parent, link_path) {
            return ScopeVerdict::Accepted;
        }

        ScopeVerdict::OutOfScope
    }

    /// Convenience wrapper returning only the accept/reject decision
    pub fn is_in_scope(&self, candidate: &str) -> bool {
        self.classify(candidate).is_accepted()
    }

    fn shares_topic(&self, parent: &str, link_path: &str) -> bool {
        self.topic_keywords
            .iter()
            .any(|keyword| parent.contains(keyword.as_str()) && link_path.contains(keyword.as_str()))
    }
}

/// Returns a path with its trailing slashes and final segment removed
///
/// Returns `None` when the trimmed path contains no `/` at all.
///
/// # Examples
///
/// ```
/// use doc_harvester::url::parent_path;
///
/// assert_eq!(parent_path("/a/b/c"), Some("/a/b"));
/// assert_eq!(parent_path("/a/b/c/"), Some("/a/b"));
/// assert_eq!(parent_path("/a"), Some(""));
/// assert_eq!(parent_path("/"), None);
/// ```
pub fn parent_path(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    trimmed.rfind('/').map(|idx| &trimmed[..idx])
}
