//! Actor Entities
//!
//! Customers and mechanics live in separate tables but share one identity
//! namespace: a username or email taken by either role is taken for both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PlatformError;

/// Which of the two actor tables a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Customer,
    Mechanic,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Mechanic => "MECHANIC",
        }
    }

    pub fn parse(s: &str) -> Result<Self, PlatformError> {
        match s.to_uppercase().as_str() {
            "CUSTOMER" => Ok(Self::Customer),
            "MECHANIC" => Ok(Self::Mechanic),
            _ => Err(PlatformError::validation(format!("Invalid role: {}", s))),
        }
    }
}

/// An identity record from either actor table
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: i64,
    pub role: ActorRole,
    pub name: String,
    pub username: String,
    pub mobile: String,
    pub email: String,
    /// Argon2id PHC string, never the plaintext secret
    pub password_hash: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl Actor {
    pub fn is_mechanic(&self) -> bool {
        self.role == ActorRole::Mechanic
    }
}

/// Fields for inserting a new actor
#[derive(Debug, Clone)]
pub struct NewActor {
    pub role: ActorRole,
    pub name: String,
    pub username: String,
    pub mobile: String,
    pub email: String,
    pub password_hash: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl NewActor {
    /// Mechanic rows must carry both coordinates.
    pub fn validate(&self) -> Result<(), PlatformError> {
        if self.role == ActorRole::Mechanic
            && (self.latitude.is_none() || self.longitude.is_none())
        {
            return Err(PlatformError::validation(
                "Mechanic must provide latitude and longitude",
            ));
        }
        Ok(())
    }
}

/// Fields an actor may change on their own profile
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(ActorRole::parse("CUSTOMER").unwrap(), ActorRole::Customer);
        assert_eq!(ActorRole::parse("mechanic").unwrap(), ActorRole::Mechanic);
        assert!(ActorRole::parse("admin").is_err());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&ActorRole::Customer).unwrap(),
            "\"CUSTOMER\""
        );
        assert_eq!(
            serde_json::to_string(&ActorRole::Mechanic).unwrap(),
            "\"MECHANIC\""
        );
    }

    fn new_actor(role: ActorRole) -> NewActor {
        NewActor {
            role,
            name: "Test Actor".to_string(),
            username: "tester".to_string(),
            mobile: "0700000000".to_string(),
            email: "tester@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_customer_needs_no_coordinates() {
        assert!(new_actor(ActorRole::Customer).validate().is_ok());
    }

    #[test]
    fn test_mechanic_requires_both_coordinates() {
        let mut actor = new_actor(ActorRole::Mechanic);
        assert!(actor.validate().is_err());

        actor.latitude = Some(1.0);
        assert!(actor.validate().is_err());

        actor.longitude = Some(2.0);
        assert!(actor.validate().is_ok());
    }
}
