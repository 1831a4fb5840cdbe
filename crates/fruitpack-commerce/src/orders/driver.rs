//! Driver availability and order claims.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::checkout::Coordinates;
use crate::ids::{ClaimId, OrderId};
use crate::CommerceError;

/// Driver availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverStatus {
    Available,
    /// Delivering an order.
    Busy,
    #[default]
    Offline,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::Busy => "busy",
            DriverStatus::Offline => "offline",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DriverStatus::Available => "Available",
            DriverStatus::Busy => "Busy",
            DriverStatus::Offline => "Offline",
        }
    }

    /// Whether the driver is taking work.
    pub fn is_online(&self) -> bool {
        !matches!(self, DriverStatus::Offline)
    }

    /// Status after flipping the availability switch.
    ///
    /// An online driver (available or busy) goes offline; an offline driver
    /// becomes available.
    pub fn toggled(&self) -> DriverStatus {
        if self.is_online() {
            DriverStatus::Offline
        } else {
            DriverStatus::Available
        }
    }
}

impl FromStr for DriverStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(DriverStatus::Available),
            "busy" => Ok(DriverStatus::Busy),
            "offline" => Ok(DriverStatus::Offline),
            other => Err(CommerceError::ValidationError(format!(
                "unknown driver status: {other}"
            ))),
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `PATCH /drivers/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverStatusUpdate {
    pub status: DriverStatus,
}

/// Body of `POST /drivers/driver/{id}/location`.
pub type LocationUpdate = Coordinates;

/// A driver's claim on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub order_id: OrderId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(DriverStatus::Available.toggled(), DriverStatus::Offline);
        assert_eq!(DriverStatus::Busy.toggled(), DriverStatus::Offline);
        assert_eq!(DriverStatus::Offline.toggled(), DriverStatus::Available);
    }

    #[test]
    fn test_status_body() {
        let body = serde_json::to_string(&DriverStatusUpdate {
            status: DriverStatus::Offline,
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"offline"}"#);
        assert!("asleep".parse::<DriverStatus>().is_err());
    }

    #[test]
    fn test_claim_from_json() {
        let claim: Claim = serde_json::from_str(
            r#"{"id": 5, "order_id": 17, "status": "pending", "created": "2025-03-02T10:15:00"}"#,
        )
        .unwrap();
        assert_eq!(claim.order_id.as_str(), "17");
        assert_eq!(claim.status.as_deref(), Some("pending"));
    }
}
