//! HTTP server module.
//!
//! Exposes the backend as a REST API on top of the existing service layer,
//! repository pattern, and portal client.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP layer (axum handlers)                               │
//! │  - Bearer-token session resolution                        │
//! │  - JSON serialization, CORS, compression, error mapping   │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service layer (services/)                                │
//! │  - Background refresh pipeline, job tracking              │
//! └───────────────────┬──────────────────────────────────────┘
//! │                   │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository layer (db/) + portal gateway client (scrape/) │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
