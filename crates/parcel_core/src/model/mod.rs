//! Domain model for tracked parcels.
//!
//! # Responsibility
//! - Define the parcel record shared by storage and workflow layers.
//!
//! # Invariants
//! - Every stored parcel is identified by a storage-assigned `ParcelNumber`.
//! - Deletion removes the record; there are no tombstones.

pub mod parcel;
