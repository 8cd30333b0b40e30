use thiserror::Error;

use crate::repository::repository::{Repository, RepositoryError};

pub struct Service {
    pub(in crate::service) repository: Repository,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Service {
    pub fn new(repository: Repository) -> Service {
        Service { repository }
    }

    /// Read access for observers that want the reactive streams directly.
    pub fn repository(&self) -> &Repository {
        &self.repository
    }
}

/// Trims `value` and rejects it when nothing is left.
pub(in crate::service) fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}

pub(in crate::service) fn not_found(entity: &str, id: i64) -> ServiceError {
    ServiceError::Repository(RepositoryError::NotFound(
        entity.to_string(),
        id.to_string(),
    ))
}

#[cfg(test)]
pub(crate) async fn test_service() -> Service {
    Service::new(Repository::in_memory().await.unwrap())
}
