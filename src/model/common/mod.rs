//! Types shared between the core ledger and the API layer.

pub mod address;
pub mod credential;
pub mod error;
