//! Repository implementations.
//!
//! Currently a single backend: `local`, the in-memory implementation used
//! for unit testing and local development. The [`StudentRepository`] trait is
//! the seam for a hosted database backend.
//!
//! [`StudentRepository`]: crate::db::repository::StudentRepository

#[cfg(feature = "local-repo")]
pub mod local;

#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
