use crate::base62;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// A validated short code identifier for a shortened URL.
///
/// A short code is always a canonical base-62 numeral (see [`base62`]), so
/// it is at most 11 symbols long and maps to exactly one `u64` value. Codes
/// are minted by [`ShortCodeCodec`](crate::ShortCodeCodec) or parsed from
/// untrusted input with [`ShortCode::parse`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShortCode {
    text: SmolStr,
    value: u64,
}

impl ShortCode {
    /// Parses a short code, rejecting anything that is not a canonical
    /// base-62 numeral.
    pub fn parse(code: &str) -> Result<Self, CoreError> {
        let value = base62::decode(code)?;
        Ok(Self {
            text: SmolStr::new(code),
            value,
        })
    }

    pub(crate) fn from_value(value: u64) -> Self {
        Self {
            text: base62::encode(value),
            value,
        }
    }

    /// The numeral's value before any obfuscation is undone.
    pub(crate) fn value(&self) -> u64 {
        self.value
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.text).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl TryFrom<&str> for ShortCode {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for ShortCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
