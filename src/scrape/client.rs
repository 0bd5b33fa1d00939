//! Portal client trait and the browser-gateway implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};

use super::session::{Credentials, ScrapeSession};

/// Scrapeable portal pages. Each maps onto a hash-routed page of the portal
/// single-page app; the gateway drives the browser there and returns the
/// rendered HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalPage {
    Timetable,
    Attendance,
}

impl PortalPage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortalPage::Timetable => "timetable",
            PortalPage::Attendance => "attendance",
        }
    }

    /// The portal's hash route for this page.
    pub fn fragment(&self) -> &'static str {
        match self {
            PortalPage::Timetable => "#Page:My_Time_Table_2023_24",
            PortalPage::Attendance => "#Page:My_Attendance",
        }
    }
}

impl std::fmt::Display for PortalPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors talking to the portal through the gateway.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// The portal rejected the credentials (or demanded a CAPTCHA).
    #[error("portal login failed: {0}")]
    LoginFailed(String),

    /// The stored cookie session is no longer accepted; re-login required.
    #[error("portal session expired or was rejected")]
    SessionExpired,

    /// The browser gateway itself misbehaved.
    #[error("browser gateway error: {0}")]
    Gateway(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A scraping client: given credentials it opens a portal session, and given
/// a session it returns raw HTML for a named portal page.
///
/// Implementations must be `Send + Sync`; handlers share one behind an `Arc`.
#[async_trait]
pub trait PortalClient: Send + Sync {
    /// Log in to the portal and capture the session cookies.
    async fn login(&self, credentials: &Credentials) -> Result<ScrapeSession, PortalError>;

    /// Fetch the rendered HTML of a portal page using an existing session.
    async fn fetch_page(
        &self,
        session: &ScrapeSession,
        page: PortalPage,
    ) -> Result<String, PortalError>;
}

#[derive(Debug, Serialize)]
struct GatewayLoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct GatewayLoginResponse {
    cookies: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct GatewayPageRequest<'a> {
    page: &'a str,
    fragment: &'a str,
    cookies: &'a BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct GatewayPageResponse {
    html: String,
}

/// Portal client backed by the headless-browser gateway sidecar.
///
/// The gateway owns one browser per login, fills the sign-in form, and
/// exposes two JSON endpoints: `POST /login` returning the captured cookie
/// jar and `POST /page` returning rendered page HTML for a cookie jar.
pub struct HttpPortalClient {
    http: reqwest::Client,
    gateway_url: String,
}

impl HttpPortalClient {
    /// Portal page renders are slow (the SPA fetches everything client-side),
    /// so the request timeout is generous.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

    pub fn new(gateway_url: impl Into<String>) -> Result<Self, PortalError> {
        let http = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Gateway URL from `PORTAL_GATEWAY_URL`, with a local default.
    pub fn from_env() -> Result<Self, PortalError> {
        let url = std::env::var("PORTAL_GATEWAY_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:4000".to_string());
        Self::new(url)
    }
}

#[async_trait]
impl PortalClient for HttpPortalClient {
    async fn login(&self, credentials: &Credentials) -> Result<ScrapeSession, PortalError> {
        info!(email = %credentials.email, "logging in to portal via gateway");
        let response = self
            .http
            .post(format!("{}/login", self.gateway_url))
            .json(&GatewayLoginRequest {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: GatewayLoginResponse = response.json().await?;
                let session = ScrapeSession::new(credentials.email.clone(), body.cookies);
                let missing = session.missing_cookies();
                if !missing.is_empty() {
                    warn!(?missing, "gateway login did not capture all required cookies");
                }
                Ok(session)
            }
            status if status == reqwest::StatusCode::UNAUTHORIZED => {
                let detail = response.text().await.unwrap_or_default();
                Err(PortalError::LoginFailed(detail))
            }
            status => {
                let detail = response.text().await.unwrap_or_default();
                Err(PortalError::Gateway(format!("{status}: {detail}")))
            }
        }
    }

    async fn fetch_page(
        &self,
        session: &ScrapeSession,
        page: PortalPage,
    ) -> Result<String, PortalError> {
        info!(email = %session.email, %page, "fetching portal page via gateway");
        let response = self
            .http
            .post(format!("{}/page", self.gateway_url))
            .json(&GatewayPageRequest {
                page: page.as_str(),
                fragment: page.fragment(),
                cookies: &session.cookies,
            })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: GatewayPageResponse = response.json().await?;
                Ok(body.html)
            }
            status if status == reqwest::StatusCode::UNAUTHORIZED => {
                Err(PortalError::SessionExpired)
            }
            status => {
                let detail = response.text().await.unwrap_or_default();
                Err(PortalError::Gateway(format!("{status}: {detail}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names_and_fragments() {
        assert_eq!(PortalPage::Timetable.as_str(), "timetable");
        assert_eq!(PortalPage::Attendance.fragment(), "#Page:My_Attendance");
        assert_eq!(PortalPage::Timetable.to_string(), "timetable");
    }

    #[test]
    fn gateway_url_is_normalized() {
        let client = HttpPortalClient::new("http://gateway:4000/").unwrap();
        assert_eq!(client.gateway_url, "http://gateway:4000");
    }
}
