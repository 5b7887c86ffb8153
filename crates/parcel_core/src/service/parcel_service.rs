//! Parcel workflow service.
//!
//! # Responsibility
//! - Provide use-case entry points (register, dispatch, deliver, re-address).
//! - Enforce the delivery workflow the store deliberately leaves open.
//!
//! # Invariants
//! - Status only moves one step forward: registered -> sent -> delivered.
//! - Address changes and cancellation are accepted only while `Registered`.
//! - Service APIs never bypass the store contract.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_repo::{ParcelStore, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for parcel workflow use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target parcel does not exist.
    NotFound(ParcelNumber),
    /// Requested status change skips or reverses the workflow.
    InvalidTransition {
        number: ParcelNumber,
        from: ParcelStatus,
        to: ParcelStatus,
    },
    /// Parcel already left the `Registered` state.
    AddressLocked {
        number: ParcelNumber,
        status: ParcelStatus,
    },
    /// Only registered parcels can be cancelled.
    NotCancellable {
        number: ParcelNumber,
        status: ParcelStatus,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(number) => write!(f, "parcel not found: {number}"),
            Self::InvalidTransition { number, from, to } => {
                write!(f, "parcel {number}: cannot move from `{from}` to `{to}`")
            }
            Self::AddressLocked { number, status } => {
                write!(f, "parcel {number}: address is locked in status `{status}`")
            }
            Self::NotCancellable { number, status } => {
                write!(f, "parcel {number}: cannot cancel in status `{status}`")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(number) => Self::NotFound(number),
            other => Self::Repo(other),
        }
    }
}

/// Use-case wrapper around a parcel store.
pub struct ParcelService<S: ParcelStore> {
    store: S,
}

impl<S: ParcelStore> ParcelService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new parcel stamped with the current time.
    ///
    /// Returns the stored record with its assigned number.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> ServiceResult<Parcel> {
        let mut parcel = Parcel::new(client, address);
        parcel.number = self.store.add(&parcel)?;
        info!(
            "event=parcel_register module=service status=ok number={} client={}",
            parcel.number, client
        );
        Ok(parcel)
    }

    pub fn parcel(&self, number: ParcelNumber) -> ServiceResult<Parcel> {
        Ok(self.store.get(number)?)
    }

    pub fn client_parcels(&self, client: ClientId) -> ServiceResult<Vec<Parcel>> {
        Ok(self.store.get_by_client(client)?)
    }

    /// Hands a registered parcel to the carrier.
    pub fn dispatch(&self, number: ParcelNumber) -> ServiceResult<()> {
        self.advance(number, ParcelStatus::Sent)
    }

    /// Marks a sent parcel as delivered.
    pub fn deliver(&self, number: ParcelNumber) -> ServiceResult<()> {
        self.advance(number, ParcelStatus::Delivered)
    }

    /// Changes the delivery address of a parcel that has not been dispatched.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> ServiceResult<()> {
        let current = self.store.get(number)?;
        if !current.status.accepts_address_change() {
            warn!(
                "event=parcel_change_address module=service status=rejected number={} parcel_status={}",
                number, current.status
            );
            return Err(ServiceError::AddressLocked {
                number,
                status: current.status,
            });
        }

        self.store.set_address(number, address)?;
        Ok(())
    }

    /// Deletes a parcel that has not been dispatched.
    pub fn cancel(&self, number: ParcelNumber) -> ServiceResult<()> {
        let current = self.store.get(number)?;
        if current.status != ParcelStatus::Registered {
            return Err(ServiceError::NotCancellable {
                number,
                status: current.status,
            });
        }

        self.store.delete(number)?;
        info!("event=parcel_cancel module=service status=ok number={number}");
        Ok(())
    }

    fn advance(&self, number: ParcelNumber, next: ParcelStatus) -> ServiceResult<()> {
        let current = self.store.get(number)?;
        if !current.status.can_transition_to(next) {
            warn!(
                "event=parcel_transition module=service status=rejected number={} from={} to={}",
                number, current.status, next
            );
            return Err(ServiceError::InvalidTransition {
                number,
                from: current.status,
                to: next,
            });
        }

        self.store.set_status(number, next)?;
        info!(
            "event=parcel_transition module=service status=ok number={} from={} to={}",
            number, current.status, next
        );
        Ok(())
    }
}
