use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    PreferNotToSay,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::NonBinary => "non-binary",
            Gender::PreferNotToSay => "prefer-not-to-say",
        }
    }
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "non-binary" | "nonbinary" => Ok(Gender::NonBinary),
            "prefer-not-to-say" | "" => Ok(Gender::PreferNotToSay),
            other => Err(CoreError::InvalidValue {
                field: "gender",
                value: other.to_string(),
            }),
        }
    }
}

/// Optional context supplied by the caller. Never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserContext {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

impl UserContext {
    /// Age, ignoring zero (the UI's "not given").
    pub fn known_age(&self) -> Option<u32> {
        self.age.filter(|a| *a > 0)
    }

    /// The location the caller supplied, if any part of it is non-blank.
    pub fn location(&self) -> Option<Location> {
        let country = non_blank(self.country.as_deref());
        let city = non_blank(self.city.as_deref());
        if country.is_none() && city.is_none() {
            return None;
        }
        Some(Location::normalized(
            country.unwrap_or_default(),
            city.unwrap_or_default(),
        )
        .with_zip(non_blank(self.zip_code.as_deref())))
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// A place to look up support resources for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Location {
    pub country: String,
    pub city: String,
    pub zip_code: Option<String>,
}

impl Location {
    pub const UNKNOWN: &'static str = "Unknown";

    /// Trim both parts and replace blanks with "Unknown".
    pub fn normalized(country: &str, city: &str) -> Self {
        let fix = |s: &str| {
            let s = s.trim();
            if s.is_empty() {
                Self::UNKNOWN.to_string()
            } else {
                s.to_string()
            }
        };
        Location {
            country: fix(country),
            city: fix(city),
            zip_code: None,
        }
    }

    pub fn unknown() -> Self {
        Self::normalized("", "")
    }

    pub fn with_zip(mut self, zip: Option<&str>) -> Self {
        self.zip_code = zip.map(str::to_string);
        self
    }

    pub fn is_unknown(&self) -> bool {
        self.country == Self::UNKNOWN && self.city == Self::UNKNOWN
    }
}
