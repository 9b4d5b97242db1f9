//! API-friendly (e.g. de/serialisable) types.

pub mod auth;
pub mod credential;
pub mod vote;
