//! Credentials and portal-session value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Cookies the portal requires on every authenticated request.
pub const REQUIRED_COOKIES: [&str; 3] = ["JSESSIONID", "iamcsr", "CT_CSRF_TOKEN"];

/// Portal login credentials, passed through to the gateway and never stored.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// The password must not leak into logs or error chains.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated portal session: the cookie jar a successful login
/// produced, tied to the student it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeSession {
    pub email: String,
    /// Cookie name → value, as captured by the gateway after login.
    pub cookies: BTreeMap<String, String>,
    pub established_at: DateTime<Utc>,
}

impl ScrapeSession {
    pub fn new(email: impl Into<String>, cookies: BTreeMap<String, String>) -> Self {
        Self {
            email: email.into(),
            cookies,
            established_at: Utc::now(),
        }
    }

    /// The `Cookie:` header value for authenticated portal requests.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Names of required cookies the gateway failed to capture.
    pub fn missing_cookies(&self) -> Vec<&'static str> {
        REQUIRED_COOKIES
            .into_iter()
            .filter(|name| !self.cookies.contains_key(*name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookies(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn debug_redacts_the_password() {
        let creds = Credentials::new("ab1234@university.edu", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn cookie_header_joins_pairs() {
        let session = ScrapeSession::new(
            "ab1234@university.edu",
            cookies(&[("JSESSIONID", "abc"), ("iamcsr", "def")]),
        );
        assert_eq!(session.cookie_header(), "JSESSIONID=abc; iamcsr=def");
    }

    #[test]
    fn missing_cookies_are_reported() {
        let session = ScrapeSession::new(
            "ab1234@university.edu",
            cookies(&[("JSESSIONID", "abc")]),
        );
        assert_eq!(session.missing_cookies(), vec!["iamcsr", "CT_CSRF_TOKEN"]);
    }
}
