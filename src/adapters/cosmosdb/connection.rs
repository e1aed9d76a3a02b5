//! Connection string parsing
//!
//! Cosmos DB connection strings are `;`-separated `Key=Value` pairs. Only
//! `AccountEndpoint` and `AccountKey` are used; other keys are ignored.

use crate::config::secret::{secret_string, SecretString};
use crate::domain::{RepoError, Result};
use secrecy::ExposeSecret;
use url::Url;

/// Parsed account endpoint and key
#[derive(Debug, Clone)]
pub struct ConnectionString {
    account_endpoint: String,
    account_key: SecretString,
}

impl ConnectionString {
    /// Parses a connection string
    ///
    /// Keys are matched case-insensitively. Values may contain `=` (account
    /// keys are base64).
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Configuration`] if either part is missing or the
    /// endpoint is not an http(s) URL. The key never appears in the message.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmos_repo::adapters::cosmosdb::ConnectionString;
    ///
    /// let conn = ConnectionString::parse(
    ///     "AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=a2V5==;",
    /// )
    /// .unwrap();
    /// assert_eq!(conn.account_endpoint(), "https://acct.documents.azure.com:443/");
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let mut endpoint = None;
        let mut key = None;

        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((name, value)) = pair.split_once('=') else {
                return Err(RepoError::Configuration(
                    "Invalid connection string: expected Key=Value pairs".to_string(),
                ));
            };

            let value = value.trim();
            if name.trim().eq_ignore_ascii_case("AccountEndpoint") {
                endpoint = Some(value.to_string());
            } else if name.trim().eq_ignore_ascii_case("AccountKey") {
                key = Some(value.to_string());
            }
        }

        let endpoint = endpoint.filter(|e| !e.is_empty()).ok_or_else(|| {
            RepoError::Configuration("Invalid connection string: missing AccountEndpoint".to_string())
        })?;
        let key = key.filter(|k| !k.is_empty()).ok_or_else(|| {
            RepoError::Configuration("Invalid connection string: missing AccountKey".to_string())
        })?;

        let url = Url::parse(&endpoint).map_err(|e| {
            RepoError::Configuration(format!("Invalid AccountEndpoint '{endpoint}': {e}"))
        })?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(RepoError::Configuration(format!(
                "AccountEndpoint must use http or https, got: {}",
                url.scheme()
            )));
        }

        Ok(Self {
            account_endpoint: endpoint,
            account_key: secret_string(key),
        })
    }

    /// The account endpoint URL
    pub fn account_endpoint(&self) -> &str {
        &self.account_endpoint
    }

    /// The account key
    pub fn account_key(&self) -> &SecretString {
        &self.account_key
    }

    /// The account key as an owned string, for handing to the SDK
    pub(crate) fn expose_key(&self) -> String {
        self.account_key.expose_secret().as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_valid_connection_string() {
        let conn = ConnectionString::parse(
            "AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=a2V5==;",
        )
        .unwrap();

        assert_eq!(conn.account_endpoint(), "https://acct.documents.azure.com:443/");
        assert_eq!(conn.expose_key(), "a2V5==");
    }

    #[test]
    fn test_parse_is_case_insensitive_and_ignores_extra_keys() {
        let conn = ConnectionString::parse(
            " accountkey=abc= ; Database=ignored; ACCOUNTENDPOINT=https://localhost:8081/ ",
        )
        .unwrap();

        assert_eq!(conn.account_endpoint(), "https://localhost:8081/");
        assert_eq!(conn.expose_key(), "abc=");
    }

    #[test_case("AccountKey=abc;" ; "missing endpoint")]
    #[test_case("AccountEndpoint=https://a/;" ; "missing key")]
    #[test_case("AccountEndpoint=https://a/;AccountKey=;" ; "empty key")]
    #[test_case("AccountEndpoint=not a url;AccountKey=abc;" ; "bad url")]
    #[test_case("AccountEndpoint=ftp://a/;AccountKey=abc;" ; "bad scheme")]
    #[test_case("garbage" ; "no pairs")]
    fn test_parse_rejects_invalid(raw: &str) {
        assert!(matches!(
            ConnectionString::parse(raw),
            Err(RepoError::Configuration(_))
        ));
    }

    #[test]
    fn test_error_does_not_leak_key() {
        let err = ConnectionString::parse("AccountEndpoint=ftp://a/;AccountKey=supersecret;")
            .unwrap_err();
        assert!(!err.to_string().contains("supersecret"));
        let debug = format!(
            "{:?}",
            ConnectionString::parse("AccountEndpoint=https://a/;AccountKey=supersecret;").unwrap()
        );
        assert!(!debug.contains("supersecret"));
    }
}
