// src/services/token.rs

//! Scanned QR text → validated submission endpoint.

use url::Url;

use crate::error::ImportError;
use crate::models::{PortalConfig, SubmissionToken};
use crate::utils::url::{get_domain, has_http_scheme, host_contains, query_param};

/// Validates scanned QR codes against the portal's URL contract.
#[derive(Debug, Clone, Default)]
pub struct TokenParser {
    portal: PortalConfig,
}

impl TokenParser {
    /// Create a parser for the given portal settings.
    pub fn new(portal: PortalConfig) -> Self {
        Self { portal }
    }

    /// Parse a scanned string into a submission token.
    ///
    /// Pure validation: the string must be an absolute HTTP(S) URL on the
    /// portal domain carrying non-empty access-key and transaction parameters.
    /// The URL is kept as-is and reused for both submission phases.
    pub fn parse(&self, raw: &str) -> Result<SubmissionToken, ImportError> {
        let raw = raw.trim();
        if !has_http_scheme(raw) {
            return Err(ImportError::InvalidFormat);
        }

        let endpoint = Url::parse(raw).map_err(|_| ImportError::InvalidFormat)?;

        if !host_contains(&endpoint, &self.portal.domain) {
            return Err(ImportError::WrongDomain {
                host: get_domain(&endpoint).unwrap_or_default(),
            });
        }

        let key = query_param(&endpoint, &self.portal.key_param)
            .ok_or_else(|| ImportError::MissingParameter(self.portal.key_param.clone()))?;
        let transaction = query_param(&endpoint, &self.portal.transaction_param).ok_or_else(
            || ImportError::MissingParameter(self.portal.transaction_param.clone()),
        )?;

        Ok(SubmissionToken::new(endpoint, key, transaction))
    }
}

/// Parse with the default portal settings.
pub fn parse(raw: &str) -> Result<SubmissionToken, ImportError> {
    TokenParser::default().parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http() {
        for raw in [
            "",
            "   ",
            "portal.edubox.com.br/import?key=A&dtu=1",
            "ftp://portal.edubox.com.br/import?key=A&dtu=1",
            "{\"url\":\"https://portal.edubox.com.br\",\"key\":\"A\"}",
            "hello world",
        ] {
            assert_eq!(parse(raw), Err(ImportError::InvalidFormat), "input {raw:?}");
        }
    }

    #[test]
    fn test_rejects_unparseable_url() {
        assert_eq!(parse("http://"), Err(ImportError::InvalidFormat));
        assert_eq!(parse("https://exa mple.com/"), Err(ImportError::InvalidFormat));
    }

    #[test]
    fn test_wrong_domain() {
        assert_eq!(
            parse("https://example.com/import"),
            Err(ImportError::WrongDomain {
                host: "example.com".into()
            })
        );
    }

    #[test]
    fn test_missing_transaction() {
        assert_eq!(
            parse("https://portal.edubox.com.br/import?key=ABC"),
            Err(ImportError::MissingParameter("dtu".into()))
        );
    }

    #[test]
    fn test_missing_or_empty_key() {
        assert_eq!(
            parse("https://portal.edubox.com.br/import?dtu=123"),
            Err(ImportError::MissingParameter("key".into()))
        );
        assert_eq!(
            parse("https://portal.edubox.com.br/import?key=&dtu=123"),
            Err(ImportError::MissingParameter("key".into()))
        );
    }

    #[test]
    fn test_valid_token_keeps_exact_url() {
        let token = parse("  https://portal.edubox.com.br/import?key=ABC&dtu=123\n").unwrap();
        assert_eq!(
            token.endpoint().as_str(),
            "https://portal.edubox.com.br/import?key=ABC&dtu=123"
        );
        assert_eq!(token.key(), "ABC");
        assert_eq!(token.transaction(), "123");
    }

    #[test]
    fn test_custom_portal() {
        let parser = TokenParser::new(PortalConfig {
            domain: "academico.example.org".into(),
            key_param: "token".into(),
            transaction_param: "tx".into(),
        });
        assert!(parser
            .parse("https://academico.example.org/up?token=T&tx=9")
            .is_ok());
        assert_eq!(
            parser.parse("https://portal.edubox.com.br/import?key=A&dtu=1"),
            Err(ImportError::WrongDomain {
                host: "portal.edubox.com.br".into()
            })
        );
    }
}
