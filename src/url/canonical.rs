use crate::UrlError;
use url::Url;

/// Parses an absolute URL string
///
/// # Arguments
///
/// * `url_str` - The URL string to parse
///
/// # Returns
///
/// * `Ok(Url)` - Parsed URL
/// * `Err(UrlError)` - The string is not an absolute URL
pub fn parse_url(url_str: &str) -> Result<Url, UrlError> {
    Url::parse(url_str.trim()).map_err(|source| UrlError::Parse {
        url: url_str.to_string(),
        source,
    })
}

/// Returns the canonical string form of a URL
///
/// Canonicalization is minimal and is the only equality basis
/// for deduplication, both in the site graph and in the document store:
///
/// 1. Remove fragment (everything after #)
/// 2. Strip trailing slashes from the path (the bare root path stays `/`)
///
/// Scheme, host, port and query are kept as parsed.
///
/// # Examples
///
/// ```
/// use doc_harvester::url::{canonical_url, parse_url};
///
/// let url = parse_url("https://example.com/docs/guide/#intro").unwrap();
/// assert_eq!(canonical_url(&url), "https://example.com/docs/guide");
/// ```
pub fn canonical_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);

    let trimmed = url.path().trim_end_matches('/').to_string();
    url.set_path(&trimmed);

    url.into()
}

/// Parses a URL string and returns its canonical form
pub fn canonicalize(url_str: &str) -> Result<String, UrlError> {
    parse_url(url_str).map(|url| canonical_url(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(s: &str) -> String {
        canonicalize(s).unwrap()
    }

    #[test]
    fn test_remove_fragment() {
        assert_eq!(
            canon("https://example.com/page#section"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_remove_trailing_slash() {
        assert_eq!(canon("https://example.com/page/"), "https://example.com/page");
    }

    #[test]
    fn test_remove_repeated_trailing_slashes() {
        assert_eq!(
            canon("https://example.com/page///"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_keep_root_slash() {
        assert_eq!(canon("https://example.com/"), "https://example.com/");
        assert_eq!(canon("https://example.com"), "https://example.com/");
    }

    #[test]
    fn test_query_is_preserved() {
        assert_eq!(
            canon("https://example.com/page/?b=2&a=1#top"),
            "https://example.com/page?b=2&a=1"
        );
    }

    #[test]
    fn test_scheme_is_not_normalized() {
        assert_ne!(
            canon("http://example.com/page"),
            canon("https://example.com/page")
        );
    }

    #[test]
    fn test_port_is_not_normalized() {
        assert_ne!(
            canon("https://example.com:8443/page"),
            canon("https://example.com/page")
        );
    }

    #[test]
    fn test_fragment_and_slash_variants_collapse() {
        let a = canon("https://example.com/docs/guide");
        let b = canon("https://example.com/docs/guide/");
        let c = canon("https://example.com/docs/guide#usage");
        let d = canon("https://example.com/docs/guide/#usage");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let result = canonicalize("/docs/guide");
        assert!(matches!(result, Err(UrlError::Parse { .. })));
    }

    #[test]
    fn test_malformed_url() {
        assert!(canonicalize("not a url").is_err());
    }
}
