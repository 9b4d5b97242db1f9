//! The ledger core and the types exchanged with clients.
//!
//! - [`common`]: value types and the failure enum shared by everything else.
//! - [`identity`] and [`ballot`]: the two owning components.
//! - [`ledger`]: both components wired together as shared server state.
//! - [`api`]: API-friendly request/response types.

pub mod api;
pub mod ballot;
pub mod common;
pub mod identity;
pub mod ledger;
