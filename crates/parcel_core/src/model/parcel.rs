//! Parcel domain model.
//!
//! # Responsibility
//! - Define the canonical parcel record persisted by the store.
//! - Own the status vocabulary and the dispatch workflow policy.
//!
//! # Invariants
//! - `number` is assigned by storage and never reused for another parcel.
//! - `created_at` is set once at creation and never mutated.
//! - Status strings are persisted verbatim and must stay stable.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned parcel identifier.
///
/// `0` marks a parcel that has not been persisted yet.
pub type ParcelNumber = i64;

/// Opaque identifier of the client a parcel ships for.
pub type ClientId = i64;

/// Delivery lifecycle state.
///
/// The intended progression is `Registered -> Sent -> Delivered`. The
/// store accepts any value; the workflow is checked by
/// [`ParcelStatus::can_transition_to`] in the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted for shipping, not yet handed to the carrier.
    Registered,
    /// In transit.
    Sent,
    /// Handed over to the recipient.
    Delivered,
}

impl ParcelStatus {
    /// All statuses in workflow order.
    pub const ALL: [ParcelStatus; 3] = [Self::Registered, Self::Sent, Self::Delivered];

    /// Stable persisted literal.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }

    /// Parses a persisted literal. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "registered" => Some(Self::Registered),
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Returns whether the workflow allows moving from `self` to `next`.
    ///
    /// Only single forward steps are legal; re-applying the current
    /// status is not a transition.
    pub fn can_transition_to(self, next: ParcelStatus) -> bool {
        matches!(
            (self, next),
            (Self::Registered, Self::Sent) | (Self::Sent, Self::Delivered)
        )
    }

    /// Address may change only before dispatch.
    pub fn accepts_address_change(self) -> bool {
        self == Self::Registered
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status literal is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown parcel status `{}`; expected ", self.0)?;
        for (index, status) in ParcelStatus::ALL.iter().enumerate() {
            if index > 0 {
                f.write_str("|")?;
            }
            f.write_str(status.as_str())?;
        }
        Ok(())
    }
}

impl Error for UnknownStatus {}

impl FromStr for ParcelStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Tracked shipment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Storage-assigned identifier; ignored on insert.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    /// Free-text delivery address.
    pub address: String,
    /// RFC 3339 UTC timestamp, second precision.
    pub created_at: String,
}

impl Parcel {
    /// Creates an unsaved, registered parcel stamped with the current time.
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self::with_created_at(client, address, now_rfc3339())
    }

    /// Creates an unsaved, registered parcel with a caller-provided timestamp.
    ///
    /// Used by import paths and tests where creation time already exists.
    pub fn with_created_at(
        client: ClientId,
        address: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: created_at.into(),
        }
    }

    /// Returns whether storage has assigned a number.
    pub fn is_persisted(&self) -> bool {
        self.number != 0
    }
}

/// Current UTC time in the persisted timestamp format (`2024-01-01T00:00:00Z`).
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::{now_rfc3339, ParcelStatus, UnknownStatus};
    use chrono::DateTime;

    #[test]
    fn status_literals_roundtrip() {
        for status in ParcelStatus::ALL {
            assert_eq!(ParcelStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ParcelStatus::parse("Sent"), None);
    }

    #[test]
    fn unknown_status_lists_every_literal() {
        let message = UnknownStatus("lost".to_string()).to_string();
        assert_eq!(
            message,
            "unknown parcel status `lost`; expected registered|sent|delivered"
        );
    }

    #[test]
    fn workflow_allows_only_single_forward_steps() {
        use ParcelStatus::{Delivered, Registered, Sent};

        assert!(Registered.can_transition_to(Sent));
        assert!(Sent.can_transition_to(Delivered));
        assert!(!Registered.can_transition_to(Delivered));
        assert!(!Delivered.can_transition_to(Registered));
        assert!(!Sent.can_transition_to(Sent));
    }

    #[test]
    fn timestamp_is_rfc3339_utc_seconds() {
        let stamp = now_rfc3339();
        assert!(stamp.ends_with('Z'), "unexpected stamp: {stamp}");
        assert!(!stamp.contains('.'), "unexpected fraction: {stamp}");
        DateTime::parse_from_rfc3339(&stamp).unwrap();
    }
}
