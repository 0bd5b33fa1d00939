//! Persistence layer for student snapshots.
//!
//! Follows the repository pattern so storage backends can be swapped without
//! touching the service or HTTP layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application layer (HTTP handlers, refresh service)     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  StudentRepository trait (repository/)                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The stored unit is a whole snapshot per (student, kind): timetable,
//! attendance, marks. Upserts supersede the previous snapshot wholesale.
//! API bearer sessions live in the same store, keyed by token.

#[cfg(not(any(feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod factory;
pub mod repositories;
pub mod repository;

pub use checksum::calculate_checksum;
pub use factory::{RepositoryFactory, RepositoryType};
#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
pub use repository::{RepositoryError, RepositoryResult, StoredSession, StudentRepository};
