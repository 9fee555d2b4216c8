use url::Url;

/// Extracts the host of a URL, with the port appended when one is explicit
///
/// # Examples
///
/// ```
/// use url::Url;
/// use doc_harvester::url::extract_host;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Returns true if both URLs name the same host and port
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
