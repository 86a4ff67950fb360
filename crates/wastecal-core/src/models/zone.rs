use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid zone code: '{0}' (expected a letter A-E followed by a digit 1-4, e.g. B2)")]
pub struct InvalidZoneCode(pub String);

/// A collection zone such as `B2`: one letter `A`-`E`, one digit `1`-`4`.
///
/// Every street belongs to exactly one zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ZoneCode(String);

impl ZoneCode {
    /// Validate a user-supplied code. Surrounding whitespace is ignored;
    /// lowercase is rejected, matching the server's validation.
    pub fn parse(input: &str) -> Result<Self, InvalidZoneCode> {
        let code = input.trim();
        let bytes = code.as_bytes();
        let valid = bytes.len() == 2
            && (b'A'..=b'E').contains(&bytes[0])
            && (b'1'..=b'4').contains(&bytes[1]);
        if valid {
            Ok(Self(code.to_string()))
        } else {
            Err(InvalidZoneCode(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ZoneCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ZoneCode {
    type Err = InvalidZoneCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ZoneCode {
    type Error = InvalidZoneCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ZoneCode> for String {
    fn from(code: ZoneCode) -> Self {
        code.0
    }
}
