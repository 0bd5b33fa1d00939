//! Portal scraping collaborator.
//!
//! Browser-automation mechanics live in an external gateway process; this
//! module holds the explicit value objects for credentials and cookie
//! sessions (never ambient/global state) and the [`PortalClient`] trait the
//! rest of the crate consumes: given a session, return raw HTML for a named
//! portal page.

mod client;
mod session;

pub use client::{HttpPortalClient, PortalClient, PortalError, PortalPage};
pub use session::{Credentials, ScrapeSession, REQUIRED_COOKIES};
