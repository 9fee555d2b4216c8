//! HTML parser for extracting links, metadata and readable content
//!
//! This module handles parsing fetched markup to extract:
//! - Links to consider (from `<a href>` tags)
//! - Page title and `<meta>` pairs
//! - The cleaned text of the main content container

use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

/// Candidate content containers, in order of preference
const CONTAINER_SELECTORS: &[&str] = &[
    "article",
    "main",
    "div[class*='content']",
    "div[id*='content']",
    "div[class*='article']",
    "div[id*='article']",
    "body",
];

/// Subtrees dropped before text is collected
const EXCLUDED_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "script", "style", "iframe", "noscript",
];

/// Elements whose text starts on a new line
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "details", "div", "dl", "dt",
    "figcaption", "figure", "form", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li",
    "main", "ol", "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

/// Errors produced while extracting content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no content container found")]
    NoContainer,

    #[error("content container has no text")]
    EmptyContent,
}

/// A parsed HTML document
///
/// Parsing never fails; malformed markup is repaired the way browsers do.
pub struct Markup {
    document: Html,
}

impl Markup {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Returns the trimmed `<title>` text, or an empty string if absent
    pub fn title(&self) -> String {
        let Ok(selector) = Selector::parse("title") else {
            return String::new();
        };

        self.document
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// Extracts all followable links in document order
    ///
    /// # Link Extraction Rules
    ///
    /// **Include:**
    /// - `<a href="...">` tags anywhere in the document, resolved against `base_url`
    ///
    /// **Exclude:**
    /// - `<a href="..." download>`
    /// - `javascript:`, `mailto:`, `tel:` links
    /// - Data URIs
    /// - Fragment-only links
    /// - Anything that does not resolve to http(s)
    ///
    /// # Example
    ///
    /// ```
    /// use doc_harvester::crawler::Markup;
    /// use url::Url;
    ///
    /// let markup = Markup::parse(r#"<body><a href="../guide">Guide</a></body>"#);
    /// let base = Url::parse("https://x.test/docs/guide/page").unwrap();
    /// assert_eq!(markup.links(&base), vec!["https://x.test/docs/guide".to_string()]);
    /// ```
    pub fn links(&self, base_url: &Url) -> Vec<String> {
        let mut links = Vec::new();

        if let Ok(a_selector) = Selector::parse("a[href]") {
            for element in self.document.select(&a_selector) {
                if element.value().attr("download").is_some() {
                    continue;
                }

                if let Some(href) = element.value().attr("href") {
                    if let Some(absolute_url) = resolve_link(href, base_url) {
                        links.push(absolute_url);
                    }
                }
            }
        }

        links
    }

    /// Collects `<meta>` tags keyed by their `name` or `property` attribute
    ///
    /// When a key repeats, the last tag wins.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();

        let Ok(selector) = Selector::parse("meta[content]") else {
            return metadata;
        };

        for element in self.document.select(&selector) {
            let value = element.value();
            let key = value.attr("name").or_else(|| value.attr("property"));

            if let (Some(key), Some(content)) = (key, value.attr("content")) {
                let key = key.trim();
                if !key.is_empty() {
                    metadata.insert(key.to_string(), content.trim().to_string());
                }
            }
        }

        metadata
    }

    /// Returns the readable text of the main content container
    ///
    /// The first match among article, main, content/article divs and body is
    /// used. Navigation and script-like subtrees are dropped, block elements
    /// start new lines and runs of whitespace collapse to one space.
    pub fn clean_content(&self) -> Result<String, ExtractError> {
        let container = self.find_container().ok_or(ExtractError::NoContainer)?;

        let mut raw = String::new();
        collect_text(container, &mut raw);

        let text = raw
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        Ok(text)
    }

    fn find_container(&self) -> Option<ElementRef<'_>> {
        CONTAINER_SELECTORS.iter().find_map(|css| {
            let selector = Selector::parse(css).ok()?;
            self.document.select(&selector).next()
        })
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            // source line breaks are not content line breaks
            out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if EXCLUDED_TAGS.contains(&name) {
                continue;
            }

            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            collect_text(child, out);
            if block {
                out.push('\n');
            }
        }
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        Markup::parse(html).links(&base_url())
    }

    #[test]
    fn test_extract_title() {
        let markup = Markup::parse("<html><head><title>  Test Page  </title></head></html>");
        assert_eq!(markup.title(), "Test Page");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let markup = Markup::parse("<html><head></head><body></body></html>");
        assert_eq!(markup.title(), "");
    }

    #[test]
    fn test_extract_relative_links_in_order() {
        let found = links(
            r#"<body>
                <a href="/other">One</a>
                <a href="sibling">Two</a>
                <a href="https://other.com/page">Three</a>
            </body>"#,
        );
        assert_eq!(
            found,
            vec![
                "https://example.com/other",
                "https://example.com/docs/sibling",
                "https://other.com/page",
            ]
        );
    }

    #[test]
    fn test_skip_special_links() {
        let found = links(
            r##"<body>
                <a href="javascript:void(0)">js</a>
                <a href="JavaScript:alert(1)">js upper</a>
                <a href="mailto:test@example.com">mail</a>
                <a href="tel:+1234567890">call</a>
                <a href="data:text/html,<h1>x</h1>">data</a>
                <a href="#section">jump</a>
                <a href="/file.pdf" download>file</a>
                <a href="ftp://example.com/file">ftp</a>
                <a href="">empty</a>
                <a href="/kept">kept</a>
            </body>"##,
        );
        assert_eq!(found, vec!["https://example.com/kept"]);
    }

    #[test]
    fn test_follow_nofollow_links() {
        let found = links(r#"<body><a href="/page" rel="nofollow">Link</a></body>"#);
        assert_eq!(found, vec!["https://example.com/page"]);
    }

    #[test]
    fn test_link_fragment_is_kept_for_canonicalization() {
        let found = links(r#"<body><a href="/docs#intro">Docs</a></body>"#);
        assert_eq!(found, vec!["https://example.com/docs#intro"]);
    }

    #[test]
    fn test_metadata() {
        let markup = Markup::parse(
            r#"<html><head>
                <meta name="description" content=" A guide ">
                <meta property="og:title" content="Guide">
                <meta charset="utf-8">
                <meta name="" content="ignored">
            </head></html>"#,
        );
        let metadata = markup.metadata();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata["description"], "A guide");
        assert_eq!(metadata["og:title"], "Guide");
    }

    #[test]
    fn test_clean_content_prefers_article() {
        let markup = Markup::parse(
            r#"<body>
                <div class="sidebar">Sidebar</div>
                <article><h1>Title</h1><p>Body text</p></article>
            </body>"#,
        );
        assert_eq!(markup.clean_content().unwrap(), "Title\nBody text");
    }

    #[test]
    fn test_clean_content_content_div() {
        let markup = Markup::parse(
            r#"<body><p>outside</p><div class="page-content"><p>inside</p></div></body>"#,
        );
        assert_eq!(markup.clean_content().unwrap(), "inside");
    }

    #[test]
    fn test_clean_content_drops_excluded_subtrees() {
        let markup = Markup::parse(
            r#"<body>
                <header>Site header</header>
                <nav><a href="/">Home</a></nav>
                <p>Real   content
                   spanning lines</p>
                <script>var x = 1;</script>
                <style>p { color: red }</style>
                <aside>Related</aside>
                <footer>Copyright</footer>
            </body>"#,
        );
        assert_eq!(
            markup.clean_content().unwrap(),
            "Real content spanning lines"
        );
    }

    #[test]
    fn test_clean_content_inline_elements_stay_on_line() {
        let markup = Markup::parse(
            "<main><p>Use <code>cargo</code> to <b>build</b>.</p><ul><li>one</li><li>two</li></ul></main>",
        );
        assert_eq!(
            markup.clean_content().unwrap(),
            "Use cargo to build.\none\ntwo"
        );
    }

    #[test]
    fn test_clean_content_empty_is_error() {
        let markup = Markup::parse("<html><body><nav>only nav</nav></body></html>");
        assert_eq!(markup.clean_content(), Err(ExtractError::EmptyContent));
    }

    #[test]
    fn test_clean_content_empty_document() {
        let markup = Markup::parse("");
        assert!(markup.clean_content().is_err());
    }
}
