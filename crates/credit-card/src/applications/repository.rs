use async_trait::async_trait;

use super::domain::{CreditCardApplication, UnknownStatus};

/// Storage abstraction over the `credit_card_application` table.
///
/// Lookups and mutations are keyed by the applicant's personal ID, never by the
/// surrogate key.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<CreditCardApplication>, RepositoryError>;

    /// `None` when no row matches.
    async fn fetch_by_applicant_id(
        &self,
        applicant_id: &str,
    ) -> Result<Option<CreditCardApplication>, RepositoryError>;

    /// Returns the stored record with its generated key, or `None` when the
    /// store did not report one.
    async fn insert(
        &self,
        application: &CreditCardApplication,
    ) -> Result<Option<CreditCardApplication>, RepositoryError>;

    /// Number of rows updated.
    async fn update_by_applicant_id(
        &self,
        application: &CreditCardApplication,
    ) -> Result<u64, RepositoryError>;

    /// Number of rows deleted.
    async fn delete_by_applicant_id(&self, applicant_id: &str) -> Result<u64, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("stored application is unreadable: {0}")]
    InvalidStatus(#[from] UnknownStatus),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
