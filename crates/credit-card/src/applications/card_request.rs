//! Outbound card requests to the issuing partner.
//!
//! A card request is never stored. It is derived from a persisted application at
//! dispatch time and posted once; every outcome is folded into a
//! [`CardRequestResponse`] so callers can relay it verbatim.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use url::Url;

use super::domain::{CreditCardApplication, Status};
use super::repository::ApplicationRepository;
use super::service::{ApplicationServiceError, CreditCardApplicationService};

/// Partner payload derived from an application by renaming its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    pub first_name: String,
    pub last_name: String,
    pub status: Status,
    pub oib: String,
}

impl From<&CreditCardApplication> for CardRequest {
    fn from(application: &CreditCardApplication) -> Self {
        Self {
            first_name: application.applicant_name.clone(),
            last_name: application.applicant_surname.clone(),
            status: application.status,
            oib: application.applicant_id.clone(),
        }
    }
}

/// Status code and body to hand back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRequestResponse {
    pub status: u16,
    pub body: String,
}

impl CardRequestResponse {
    /// 500 carrying a description of a failure that produced no HTTP response.
    pub fn failure(description: impl fmt::Display) -> Self {
        Self {
            status: 500,
            body: format!("An error occurred: {description}"),
        }
    }
}

/// Transport seam for the partner call.
#[async_trait]
pub trait CardRequestGateway: Send + Sync {
    /// Exactly one attempt; never fails, see [`CardRequestResponse`].
    async fn send(&self, request: &CardRequest) -> CardRequestResponse;
}

/// Reqwest-backed gateway posting JSON to a single endpoint.
pub struct HttpCardRequestClient {
    client: Client,
    endpoint: Url,
}

impl HttpCardRequestClient {
    /// Uses transport default timeouts.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl CardRequestGateway for HttpCardRequestClient {
    async fn send(&self, request: &CardRequest) -> CardRequestResponse {
        info!(status = %request.status, endpoint = %self.endpoint, "sending card request");

        let response = match self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "card request could not be delivered");
                return CardRequestResponse::failure(err);
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => CardRequestResponse { status, body },
            Err(err) => {
                error!(status, error = %err, "card request response could not be read");
                CardRequestResponse::failure(err)
            }
        }
    }
}

/// Loads an application by personal ID and forwards it to the partner.
pub struct CardRequestService<R, G> {
    applications: Arc<CreditCardApplicationService<R>>,
    gateway: Arc<G>,
}

impl<R, G> CardRequestService<R, G>
where
    R: ApplicationRepository + 'static,
    G: CardRequestGateway + 'static,
{
    pub fn new(applications: Arc<CreditCardApplicationService<R>>, gateway: Arc<G>) -> Self {
        Self {
            applications,
            gateway,
        }
    }

    /// Fails only when the application cannot be loaded; partner outcomes are
    /// returned as-is.
    pub async fn send_for_personal_id(
        &self,
        id: &str,
    ) -> Result<CardRequestResponse, ApplicationServiceError> {
        let application = self.applications.get_by_personal_id(id).await?;
        let request = CardRequest::from(&application);
        Ok(self.gateway.send(&request).await)
    }
}
