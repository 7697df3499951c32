//! Credit card application records and partner card requests.
//!
//! Layering, leaf first: [`domain`] and [`validation`] are pure; [`repository`]
//! is the storage seam with [`sql`] as its SQLite adapter; [`service`] holds the
//! business rules; [`card_request`] talks to the partner; [`router`] and
//! [`response`] form the HTTP boundary.

pub mod card_request;
pub mod domain;
pub mod repository;
pub mod response;
pub mod router;
pub mod service;
pub mod sql;
pub mod validation;

#[cfg(test)]
mod tests;

pub use card_request::{
    CardRequest, CardRequestGateway, CardRequestResponse, CardRequestService,
    HttpCardRequestClient,
};
pub use domain::{ApplicationPayload, CreditCardApplication, FieldErrors, Status, UnknownStatus};
pub use repository::{ApplicationRepository, RepositoryError};
pub use response::{ApiError, ApiErrorResponse};
pub use router::{application_router, ApplicationState};
pub use service::{ApplicationServiceError, CreditCardApplicationService};
pub use sql::{SqlApplicationRepository, StoreSetupError};
pub use validation::{validate_personal_id, PersonalIdError, PERSONAL_ID_LENGTH};
