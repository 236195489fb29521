//! Movie session scheduling rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Spoken language of a screening. Stored as its two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionLanguage {
    #[default]
    #[serde(rename = "RU")]
    Russian,
    #[serde(rename = "EN")]
    English,
    #[serde(rename = "KZ")]
    Kazakh,
}

impl SessionLanguage {
    pub fn code(self) -> &'static str {
        match self {
            Self::Russian => "RU",
            Self::English => "EN",
            Self::Kazakh => "KZ",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Russian => "Russian",
            Self::English => "English",
            Self::Kazakh => "Kazakh",
        }
    }
}

impl fmt::Display for SessionLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SessionLanguage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RU" => Ok(Self::Russian),
            "EN" => Ok(Self::English),
            "KZ" => Ok(Self::Kazakh),
            other => Err(CoreError::Validation(format!(
                "Unsupported session language '{other}'"
            ))),
        }
    }
}

/// Initial `available_seats` for a new session in a hall of `capacity`.
///
/// Defaults to the full hall; an explicit value must lie in `0..=capacity`.
pub fn initial_available_seats(requested: Option<i32>, capacity: i32) -> Result<i32, CoreError> {
    if capacity <= 0 {
        return Err(CoreError::Validation(format!(
            "Hall capacity must be positive, got {capacity}"
        )));
    }
    match requested {
        None => Ok(capacity),
        Some(n) if (0..=capacity).contains(&n) => Ok(n),
        Some(n) => Err(CoreError::Validation(format!(
            "available_seats must be between 0 and the hall capacity {capacity}, got {n}"
        ))),
    }
}
