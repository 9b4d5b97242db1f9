use std::fmt::{Display, Formatter};
use std::str::FromStr;

use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use rocket::{
    http::{
        impl_from_uri_param_identity,
        uri::fmt::{Path, UriDisplay},
    },
    request::FromParam,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of bytes in an account address.
pub const ADDRESS_LENGTH: usize = 20;

const PREFIX: &str = "0x";

/// An account address, as supplied by the execution environment for every call.
///
/// The textual form is `0x` followed by 40 hex digits. Parsing accepts either
/// case; display is always lowercase.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Address must start with `0x`: {0}")]
    MissingPrefix(String),
    #[error("Address must have {} hex digits: {0}", ADDRESS_LENGTH * 2)]
    WrongLength(String),
    #[error("Address is not valid hex: {0}")]
    Hex(String),
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;
        if digits.len() != ADDRESS_LENGTH * 2 {
            return Err(AddressError::WrongLength(s.to_string()));
        }
        let decoded = HEXLOWER_PERMISSIVE
            .decode(digits.as_bytes())
            .map_err(|_| AddressError::Hex(s.to_string()))?;
        let mut bytes = [0_u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{PREFIX}{}", HEXLOWER.encode(&self.0))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl<'a> FromParam<'a> for Address {
    type Error = AddressError;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse()
    }
}

impl UriDisplay<Path> for Address {
    fn fmt(&self, formatter: &mut rocket::http::uri::fmt::Formatter<'_, Path>) -> std::fmt::Result {
        formatter.write_value(self.to_string())
    }
}

impl_from_uri_param_identity!([Path] Address);

/// Example data for tests.
#[cfg(test)]
pub mod examples {
    use super::*;

    impl Address {
        /// The administrator of the test ledger.
        pub fn admin() -> Self {
            Self([0xad; ADDRESS_LENGTH])
        }

        /// A distinct participant address for each seed.
        pub fn participant(seed: u8) -> Self {
            let mut bytes = [0_u8; ADDRESS_LENGTH];
            bytes[ADDRESS_LENGTH - 1] = seed;
            bytes[0] = 0x11;
            Self(bytes)
        }
    }
}
