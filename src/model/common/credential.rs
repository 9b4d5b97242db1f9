use std::fmt::{Display, Formatter};
use std::num::NonZeroU64;

use rocket::{
    http::{
        impl_from_uri_param_identity,
        uri::fmt::{Path, UriDisplay},
    },
    request::FromParam,
};
use serde::{Deserialize, Serialize};

/// Unique identifier of a credential. Allocated at mint time, starting at 1,
/// never reused. Absence of a credential is `None`, never a zero id.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(NonZeroU64);

impl CredentialId {
    /// The first id ever allocated.
    pub const FIRST: Self = Self(NonZeroU64::MIN);

    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }

    /// The id allocated after this one.
    ///
    /// Returns `None` only once the id space is exhausted.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl Display for CredentialId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CredentialId> for u64 {
    fn from(id: CredentialId) -> Self {
        id.get()
    }
}

impl<'a> FromParam<'a> for CredentialId {
    type Error = &'a str;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param
            .parse::<u64>()
            .ok()
            .and_then(CredentialId::new)
            .ok_or(param)
    }
}

impl UriDisplay<Path> for CredentialId {
    fn fmt(&self, formatter: &mut rocket::http::uri::fmt::Formatter<'_, Path>) -> std::fmt::Result {
        formatter.write_value(self.get())
    }
}

impl_from_uri_param_identity!([Path] CredentialId);
