use url::Url;

/// Validate a link before handing it to the system browser.
///
/// Item links come from feed content, so anything other than a plain
/// http(s) URL with a host is refused: no `file:`, `javascript:`, or other
/// schemes that `open` might route somewhere surprising.
pub fn validate_browser_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    match url.scheme() {
        "http" | "https" => {}
        _ => return None,
    }
    url.host_str()?;
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_http_and_https() {
        assert!(validate_browser_url("https://example.com/post/1").is_some());
        assert!(validate_browser_url("http://example.com").is_some());
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(validate_browser_url("javascript:alert(1)").is_none());
        assert!(validate_browser_url("file:///etc/passwd").is_none());
        assert!(validate_browser_url("ftp://example.com").is_none());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(validate_browser_url("not a url").is_none());
        assert!(validate_browser_url("").is_none());
    }
}
