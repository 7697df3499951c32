use std::sync::Arc;

use tracing::{error, warn};

use super::domain::CreditCardApplication;
use super::repository::{ApplicationRepository, RepositoryError};
use super::validation::{validate_personal_id, PersonalIdError};

/// Business rules over the application store: personal ID validation before any
/// I/O and translation of store outcomes into typed failures.
pub struct CreditCardApplicationService<R> {
    repository: Arc<R>,
}

impl<R> CreditCardApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// All stored applications in store order.
    pub async fn list(&self) -> Result<Vec<CreditCardApplication>, ApplicationServiceError> {
        Ok(self.repository.list().await?)
    }

    pub async fn get_by_personal_id(
        &self,
        id: &str,
    ) -> Result<CreditCardApplication, ApplicationServiceError> {
        let id = validate(id)?;

        match self.repository.fetch_by_applicant_id(id).await? {
            Some(application) => Ok(application),
            None => Err(not_found()),
        }
    }

    /// Insert a new application under its trimmed personal ID.
    ///
    /// When the store does not confirm a generated key the row has still been
    /// written, so the submitted application is returned without a surrogate key.
    pub async fn add(
        &self,
        mut application: CreditCardApplication,
    ) -> Result<CreditCardApplication, ApplicationServiceError> {
        application.applicant_id = validate(&application.applicant_id)?.to_string();

        match self.repository.insert(&application).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => {
                warn!("store did not report a generated key for the new credit card application");
                Ok(application)
            }
            Err(RepositoryError::Conflict) => {
                error!("Failed to add credit card application.");
                Err(ApplicationServiceError::DuplicateEntry)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Update the application named in the path. The body must carry the same
    /// personal ID, compared before trimming. The stored record is returned
    /// without re-reading the store.
    pub async fn update_by_personal_id(
        &self,
        id: &str,
        mut application: CreditCardApplication,
    ) -> Result<CreditCardApplication, ApplicationServiceError> {
        let normalized = validate(&application.applicant_id)?.to_string();

        if id != application.applicant_id {
            let err = ApplicationServiceError::PersonalIdMismatch;
            error!("{err}");
            return Err(err);
        }
        application.applicant_id = normalized;

        let updated = self.repository.update_by_applicant_id(&application).await?;
        if updated == 0 {
            return Err(not_found());
        }

        Ok(application)
    }

    pub async fn delete_by_personal_id(&self, id: &str) -> Result<(), ApplicationServiceError> {
        let id = validate(id)?;

        let deleted = self.repository.delete_by_applicant_id(id).await?;
        if deleted == 0 {
            return Err(not_found());
        }

        Ok(())
    }
}

fn validate(id: &str) -> Result<&str, PersonalIdError> {
    validate_personal_id(id).inspect_err(|err| error!("{err}"))
}

fn not_found() -> ApplicationServiceError {
    error!("No credit card application with given personal ID was found.");
    ApplicationServiceError::NotFound
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    InvalidPersonalId(#[from] PersonalIdError),
    #[error("Personal ID in the path and in the request body do not match.")]
    PersonalIdMismatch,
    #[error("No credit card application with given personal id was found.")]
    NotFound,
    #[error("An entry with the given personal id already exists.")]
    DuplicateEntry,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
