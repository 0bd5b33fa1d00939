//! Factory for creating repository instances.

use std::str::FromStr;
use std::sync::Arc;

use super::repository::{RepositoryError, RepositoryResult, StudentRepository};

/// Available repository backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory backend for testing and local development.
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" | "in-memory" => Ok(RepositoryType::Local),
            other => Err(format!("unknown repository type: {other:?}")),
        }
    }
}

/// Creates repository instances by backend type.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository of the given type.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn StudentRepository>> {
        match repo_type {
            #[cfg(feature = "local-repo")]
            RepositoryType::Local => Ok(Self::create_local()),
            #[cfg(not(feature = "local-repo"))]
            RepositoryType::Local => Err(RepositoryError::configuration(
                "local-repo feature is not enabled",
            )),
        }
    }

    /// Create the in-memory repository.
    #[cfg(feature = "local-repo")]
    pub fn create_local() -> Arc<dyn StudentRepository> {
        Arc::new(super::repositories::LocalRepository::new())
    }

    /// Create the repository selected by `REPOSITORY_TYPE` (default: local).
    pub fn from_env() -> RepositoryResult<Arc<dyn StudentRepository>> {
        let raw = std::env::var("REPOSITORY_TYPE").unwrap_or_else(|_| "local".to_string());
        let repo_type = RepositoryType::from_str(&raw).map_err(RepositoryError::configuration)?;
        Self::create(repo_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_type_parsing() {
        assert_eq!(RepositoryType::from_str("local").unwrap(), RepositoryType::Local);
        assert_eq!(RepositoryType::from_str(" Memory ").unwrap(), RepositoryType::Local);
        assert!(RepositoryType::from_str("postgres").is_err());
    }

    #[tokio::test]
    async fn created_repository_is_healthy() {
        let repo = RepositoryFactory::create(RepositoryType::Local).unwrap();
        assert!(repo.health_check().await.unwrap());
    }
}
