//! Content-script match patterns (`<scheme>://<host>/<path>`)

use std::fmt;
use std::str::FromStr;

use delegate_domain::DelegateError;
use url::Url;

/// A parsed match pattern. Host `*` matches any host and a leading `*.`
/// matches the domain and its subdomains. Path `*` is a prefix wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPattern {
    scheme: String,
    host: String,
    path: String,
}

impl MatchPattern {
    /// The pattern covering every page of `host`.
    pub fn for_host(scheme: &str, host: &str) -> Self {
        Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_ascii_lowercase(),
            path: "/*".to_string(),
        }
    }

    pub fn matches(&self, url: &Url) -> bool {
        let scheme_ok = self.scheme == "*" || self.scheme == url.scheme();
        let host = url.host_str().unwrap_or_default();
        let host_ok = match self.host.strip_prefix("*.") {
            _ if self.host == "*" => true,
            Some(domain) => host == domain || host.ends_with(&format!(".{domain}")),
            None => host == self.host,
        };
        let path_ok = match self.path.strip_suffix('*') {
            Some(prefix) => url.path().starts_with(prefix),
            None => url.path() == self.path,
        };
        scheme_ok && host_ok && path_ok
    }

    /// Convenience over [`MatchPattern::matches`] for unparsed URLs.
    pub fn matches_str(&self, url: &str) -> bool {
        Url::parse(url).is_ok_and(|url| self.matches(&url))
    }
}

impl FromStr for MatchPattern {
    type Err = DelegateError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let invalid = || DelegateError::Validation(format!("invalid match pattern: {pattern}"));
        let (scheme, rest) = pattern.split_once("://").ok_or_else(invalid)?;
        let (host, path) = match rest.find('/') {
            Some(at) => rest.split_at(at),
            None => return Err(invalid()),
        };
        if scheme.is_empty() || host.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_ascii_lowercase(),
            path: path.to_string(),
        })
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)
    }
}
