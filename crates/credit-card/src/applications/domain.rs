use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle state of a credit card application.
///
/// The canonical display string is used both on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pending,
    Rejected,
    Approved,
    UnderReview,
    OnHold,
    Cancelled,
    ApprovedPendingActivation,
    Expired,
    RequiresFollowUp,
}

impl Status {
    pub const ALL: [Self; 9] = [
        Self::Pending,
        Self::Rejected,
        Self::Approved,
        Self::UnderReview,
        Self::OnHold,
        Self::Cancelled,
        Self::ApprovedPendingActivation,
        Self::Expired,
        Self::RequiresFollowUp,
    ];

    pub const fn value(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Rejected => "Rejected",
            Status::Approved => "Approved",
            Status::UnderReview => "Under Review",
            Status::OnHold => "On Hold",
            Status::Cancelled => "Cancelled",
            Status::ApprovedPendingActivation => "Approved Pending Activation",
            Status::Expired => "Expired",
            Status::RequiresFollowUp => "Requires Follow Up",
        }
    }

    /// Case-insensitive lookup by display string.
    pub fn from_value(raw: &str) -> Result<Self, UnknownStatus> {
        Self::ALL
            .into_iter()
            .find(|status| status.value().eq_ignore_ascii_case(raw))
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(s)
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.value())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Status::from_value(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown enum value: {0}")]
pub struct UnknownStatus(pub String);

/// Persisted credit card application keyed by the applicant's personal ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCardApplication {
    #[serde(
        rename = "creditCardApplicationId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<i64>,
    #[serde(rename = "creditCardApplicantName")]
    pub applicant_name: String,
    #[serde(rename = "creditCardApplicantSurname")]
    pub applicant_surname: String,
    #[serde(rename = "creditCardApplicantId")]
    pub applicant_id: String,
    #[serde(rename = "creditCardApplicationStatus")]
    pub status: Status,
}

impl CreditCardApplication {
    pub fn new(
        applicant_name: impl Into<String>,
        applicant_surname: impl Into<String>,
        applicant_id: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            id: None,
            applicant_name: applicant_name.into(),
            applicant_surname: applicant_surname.into(),
            applicant_id: applicant_id.into(),
            status,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Compares every field except the store-assigned surrogate key.
    pub fn same_application(&self, other: &Self) -> bool {
        self.applicant_name == other.applicant_name
            && self.applicant_surname == other.applicant_surname
            && self.applicant_id == other.applicant_id
            && self.status == other.status
    }
}

/// Request body accepted by the create and update endpoints.
///
/// Fields are optional so missing values can be reported together instead of
/// failing on the first absent key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPayload {
    #[serde(
        rename = "creditCardApplicantName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub applicant_name: Option<String>,
    #[serde(
        rename = "creditCardApplicantSurname",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub applicant_surname: Option<String>,
    #[serde(
        rename = "creditCardApplicantId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub applicant_id: Option<String>,
    #[serde(
        rename = "creditCardApplicationStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Status>,
}

impl ApplicationPayload {
    pub fn into_application(self) -> Result<CreditCardApplication, FieldErrors> {
        let mut errors = Vec::new();
        if self.applicant_name.is_none() {
            errors.push("Applicant name is required".to_string());
        }
        if self.applicant_surname.is_none() {
            errors.push("Applicant surname is required".to_string());
        }
        if self.applicant_id.is_none() {
            errors.push("Applicant ID is required".to_string());
        }
        if self.status.is_none() {
            errors.push("Application status is required".to_string());
        }

        match (
            self.applicant_name,
            self.applicant_surname,
            self.applicant_id,
            self.status,
        ) {
            (Some(name), Some(surname), Some(applicant_id), Some(status)) => Ok(
                CreditCardApplication::new(name, surname, applicant_id, status),
            ),
            _ => Err(FieldErrors(errors)),
        }
    }
}

impl From<CreditCardApplication> for ApplicationPayload {
    fn from(application: CreditCardApplication) -> Self {
        Self {
            applicant_name: Some(application.applicant_name),
            applicant_surname: Some(application.applicant_surname),
            applicant_id: Some(application.applicant_id),
            status: Some(application.status),
        }
    }
}

/// Aggregated field-level validation failures, rendered as `[first, second]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{}]", .0.join(", "))]
pub struct FieldErrors(pub Vec<String>);
