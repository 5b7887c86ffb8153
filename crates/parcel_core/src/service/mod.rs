//! Core use-case services.
//!
//! # Responsibility
//! - Layer the delivery workflow on top of the parcel store.
//! - Keep callers decoupled from storage details.

pub mod parcel_service;
