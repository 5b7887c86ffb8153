//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the parcel data access contract.
//! - Isolate SQLite query details from workflow orchestration.
//!
//! # Invariants
//! - Repository APIs return a semantic `NotFound` distinct from DB transport errors.
//! - The repository never validates status transitions.

pub mod parcel_repo;
