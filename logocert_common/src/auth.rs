//! OAuth and Cloud Print endpoints (`[AUTH]`, `[GCP]`).
//!
//! Only syntax is checked here. Nothing is fetched and no token flow runs;
//! the HTTP client that consumes these values owns all network behavior.

use std::path::PathBuf;

use url::Url;

use crate::config::{RawAuth, RawGcp, path_to_source};
use crate::error::{ExportError, SchemaError};

/// OAuth client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Accounts service root.
    pub accounts: Url,
    /// Authorization endpoint.
    pub oauth: Url,
    /// Token endpoint.
    pub oauth_token: Url,
    /// Where the client persists obtained credentials.
    pub cred_file: PathBuf,
    /// Redirect URI; may be a URN for out-of-band flows.
    pub redirect: Url,
    /// Requested scopes, in source order.
    pub scopes: Vec<Url>,
    pub user_agent: String,
}

impl AuthConfig {
    pub fn from_raw(raw: &RawAuth) -> Result<Self, SchemaError> {
        let accounts = parse_http_url("AUTH", "ACCOUNTS", &raw.accounts)?;
        let oauth = parse_http_url("AUTH", "OAUTH", &raw.oauth)?;
        let oauth_token = parse_http_url("AUTH", "OAUTH_TOKEN", &raw.oauth_token)?;
        let redirect = parse_uri("AUTH", "REDIRECT", &raw.redirect)?;

        let scopes = raw
            .scope
            .split_whitespace()
            .map(|s| parse_uri("AUTH", "SCOPE", s))
            .collect::<Result<Vec<_>, _>>()?;
        if scopes.is_empty() {
            return Err(SchemaError::EmptyScope);
        }

        if raw.user_agent.trim().is_empty() {
            return Err(SchemaError::EmptyValue {
                group: "AUTH",
                key: "USER_AGENT".to_string(),
            });
        }
        if raw.cred_file.is_empty() {
            return Err(SchemaError::EmptyValue {
                group: "AUTH",
                key: "CRED_FILE".to_string(),
            });
        }

        Ok(Self {
            accounts,
            oauth,
            oauth_token,
            cred_file: PathBuf::from(&raw.cred_file),
            redirect,
            scopes,
            user_agent: raw.user_agent.clone(),
        })
    }

    /// Scopes joined the way OAuth requests carry them.
    pub fn scope(&self) -> String {
        self.scopes
            .iter()
            .map(Url::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn to_raw(&self) -> Result<RawAuth, ExportError> {
        Ok(RawAuth {
            accounts: self.accounts.to_string(),
            oauth: self.oauth.to_string(),
            oauth_token: self.oauth_token.to_string(),
            cred_file: path_to_source("AUTH", "CRED_FILE", &self.cred_file)?,
            redirect: self.redirect.to_string(),
            scope: self.scope(),
            user_agent: self.user_agent.clone(),
        })
    }
}

/// Google Cloud Print service endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcpConfig {
    /// Printer management page.
    pub mgt: Url,
}

impl GcpConfig {
    pub fn from_raw(raw: &RawGcp) -> Result<Self, SchemaError> {
        Ok(Self {
            mgt: parse_http_url("GCP", "MGT", &raw.mgt)?,
        })
    }

    pub(crate) fn to_raw(&self) -> RawGcp {
        RawGcp {
            mgt: self.mgt.to_string(),
        }
    }
}

/// Any absolute URI, cannot-be-a-base forms such as URNs included.
fn parse_uri(group: &'static str, key: &str, value: &str) -> Result<Url, SchemaError> {
    Url::parse(value).map_err(|_| invalid_uri(group, key, value))
}

/// An `http` or `https` URL with a host.
fn parse_http_url(group: &'static str, key: &str, value: &str) -> Result<Url, SchemaError> {
    let url = parse_uri(group, key, value)?;
    if matches!(url.scheme(), "http" | "https") && url.host().is_some() {
        Ok(url)
    } else {
        Err(invalid_uri(group, key, value))
    }
}

fn invalid_uri(group: &'static str, key: &str, value: &str) -> SchemaError {
    SchemaError::InvalidUri {
        group,
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_auth() -> RawAuth {
        RawAuth {
            accounts: "https://accounts.google.com".to_string(),
            oauth: "https://accounts.google.com/o/oauth2/auth".to_string(),
            oauth_token: "https://www.googleapis.com/oauth2/v3/token".to_string(),
            cred_file: "credentials.json".to_string(),
            redirect: "urn:ietf:wg:oauth:2.0:oob".to_string(),
            scope: "https://www.googleapis.com/auth/cloudprint  https://spreadsheets.google.com/feeds/"
                .to_string(),
            user_agent: "CloudPrint_Client".to_string(),
        }
    }

    #[test]
    fn uri_syntax() {
        for good in [
            "urn:ietf:wg:oauth:2.0:oob",
            "https://www.googleapis.com/auth/drive",
            "mailto:team@example.com",
        ] {
            assert!(parse_uri("AUTH", "SCOPE", good).is_ok(), "{good:?} should parse");
        }
        for bad in [
            "cloudprint",
            "://missing-scheme",
            "1http://digit-first",
            "https://",
            "https://bad host",
        ] {
            assert!(parse_uri("AUTH", "SCOPE", bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn http_url_syntax() {
        assert!(parse_http_url("GCP", "MGT", "https://www.google.com/cloudprint").is_ok());
        assert!(parse_http_url("GCP", "MGT", "http://192.168.1.20:8080/privet/info").is_ok());
        for bad in [
            "https://",
            "https://host:abc/x",
            "https://[::1/x",
            "ftp://example.com",
            "urn:ietf:wg:oauth:2.0:oob",
        ] {
            assert_eq!(
                parse_http_url("GCP", "MGT", bad),
                Err(invalid_uri("GCP", "MGT", bad)),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn redirect_urn_accepted() {
        let auth = AuthConfig::from_raw(&raw_auth()).unwrap();
        assert!(auth.redirect.cannot_be_a_base());
        assert_eq!(auth.redirect.as_str(), "urn:ietf:wg:oauth:2.0:oob");
    }

    #[test]
    fn scopes_split_on_whitespace() {
        let auth = AuthConfig::from_raw(&raw_auth()).unwrap();
        assert_eq!(auth.scopes.len(), 2);
        assert_eq!(
            auth.scope(),
            "https://www.googleapis.com/auth/cloudprint https://spreadsheets.google.com/feeds/"
        );
    }

    #[test]
    fn empty_scope_rejected() {
        let mut raw = raw_auth();
        raw.scope = "   ".to_string();
        assert_eq!(AuthConfig::from_raw(&raw), Err(SchemaError::EmptyScope));
    }

    #[test]
    fn malformed_scope_rejected() {
        let mut raw = raw_auth();
        raw.scope = "https://www.googleapis.com/auth/drive cloudprint".to_string();
        assert!(matches!(
            AuthConfig::from_raw(&raw),
            Err(SchemaError::InvalidUri { group: "AUTH", ref key, .. }) if key == "SCOPE"
        ));
    }

    #[test]
    fn hostless_scope_rejected() {
        let mut raw = raw_auth();
        raw.scope = "https://www.googleapis.com/auth/drive https:// http://".to_string();
        assert_eq!(
            AuthConfig::from_raw(&raw),
            Err(invalid_uri("AUTH", "SCOPE", "https://"))
        );
    }

    #[test]
    fn malformed_endpoint_rejected() {
        let mut raw = raw_auth();
        raw.oauth_token = "www.googleapis.com/oauth2/v3/token".to_string();
        assert!(matches!(
            AuthConfig::from_raw(&raw),
            Err(SchemaError::InvalidUri { ref key, .. }) if key == "OAUTH_TOKEN"
        ));

        raw.oauth_token = "https://www.googleapis.com:notaport/token".to_string();
        assert_eq!(
            AuthConfig::from_raw(&raw),
            Err(invalid_uri(
                "AUTH",
                "OAUTH_TOKEN",
                "https://www.googleapis.com:notaport/token"
            ))
        );
    }

    #[test]
    fn raw_round_trip_reparses_equal() {
        let auth = AuthConfig::from_raw(&raw_auth()).unwrap();
        let again = AuthConfig::from_raw(&auth.to_raw().unwrap()).unwrap();
        assert_eq!(again, auth);
    }

    #[test]
    fn gcp_management_url() {
        let gcp = GcpConfig::from_raw(&RawGcp {
            mgt: "https://www.google.com/cloudprint".to_string(),
        })
        .unwrap();
        assert_eq!(gcp.mgt.as_str(), "https://www.google.com/cloudprint");
        assert!(GcpConfig::from_raw(&RawGcp { mgt: "cloudprint".to_string() }).is_err());
        assert!(GcpConfig::from_raw(&RawGcp { mgt: "https://".to_string() }).is_err());
    }
}
