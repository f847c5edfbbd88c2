//! Signature types: the calling-convention family a user function follows.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calling convention declared for the served function.
///
/// Parsed case-insensitively from both config files and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureType {
    /// Plain request/response handler.
    #[default]
    Http,
    /// Legacy event handler receiving `(data, context)`.
    Event,
    /// Handler receiving a structured CloudEvents envelope.
    #[serde(rename = "cloudevent")]
    CloudEvent,
}

impl SignatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureType::Http => "http",
            SignatureType::Event => "event",
            SignatureType::CloudEvent => "cloudevent",
        }
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a signature type string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signature type '{0}' (expected http, event or cloudevent)")]
pub struct ParseSignatureError(String);

impl FromStr for SignatureType {
    type Err = ParseSignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(SignatureType::Http),
            "event" => Ok(SignatureType::Event),
            "cloudevent" => Ok(SignatureType::CloudEvent),
            _ => Err(ParseSignatureError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for SignatureType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
