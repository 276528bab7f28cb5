// src/utils/url.rs

//! URL inspection utilities.

use url::Url;

/// Whether a string starts with an `http://` or `https://` scheme (any case).
///
/// # Examples
/// ```
/// use edubox_import::utils::url::has_http_scheme;
///
/// assert!(has_http_scheme("HTTPS://portal.edubox.com.br/"));
/// assert!(!has_http_scheme("ftp://portal.edubox.com.br/"));
/// ```
pub fn has_http_scheme(raw: &str) -> bool {
    let lower = raw
        .get(..8)
        .unwrap_or(raw)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Extract the lowercase host of a URL.
pub fn get_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Whether the URL host contains the given domain fragment.
pub fn host_contains(url: &Url, domain: &str) -> bool {
    get_domain(url).is_some_and(|host| host.contains(&domain.to_lowercase()))
}

/// First value of a query parameter, if present and non-empty.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_http_scheme() {
        assert!(has_http_scheme("http://a"));
        assert!(has_http_scheme("https://a"));
        assert!(has_http_scheme("HtTp://a"));
        assert!(!has_http_scheme("httpx://a"));
        assert!(!has_http_scheme("http"));
        assert!(!has_http_scheme("{\"url\":\"https://a\"}"));
        assert!(!has_http_scheme(""));
    }

    #[test]
    fn test_get_domain() {
        let url = Url::parse("https://Portal.Edubox.COM.br:8443/x").unwrap();
        assert_eq!(get_domain(&url), Some("portal.edubox.com.br".to_string()));
    }

    #[test]
    fn test_host_contains() {
        let url = Url::parse("https://portal.edubox.com.br/import").unwrap();
        assert!(host_contains(&url, "edubox.com.br"));
        assert!(!host_contains(&url, "example.com"));
    }

    #[test]
    fn test_query_param_first_value() {
        let url = Url::parse("https://x.test/?key=A&key=B&dtu=&n=%C3%A7").unwrap();
        assert_eq!(query_param(&url, "key"), Some("A".to_string()));
        assert_eq!(query_param(&url, "dtu"), None);
        assert_eq!(query_param(&url, "n"), Some("ç".to_string()));
        assert_eq!(query_param(&url, "missing"), None);
    }
}
