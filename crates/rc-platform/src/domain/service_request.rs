//! Service Request Entities
//!
//! A customer-initiated work order moving through Pending into one of the
//! terminal states. Approving assigns the acting mechanic; rejecting leaves
//! the request unassigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Approved and Rejected do not transition further. Approve and reject
    /// statements overwrite without checking, matching the observed backend
    /// behavior.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A persisted service request
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub id: i64,
    pub customer_name: String,
    pub phone_number: String,
    pub service_type: String,
    pub location: String,
    /// Back-reference to a customer actor; requests may be filed anonymously
    pub user_id: Option<i64>,
    /// Set if and only if the request was approved, to the approving mechanic
    pub mechanic_id: Option<i64>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new service request; status always starts Pending
#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub customer_name: String,
    pub phone_number: String,
    pub service_type: String,
    pub location: String,
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::Rejected,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::parse("CANCELLED"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }
}
