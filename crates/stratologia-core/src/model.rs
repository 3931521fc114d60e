//! Records owned by the persistence layer.
//!
//! Enum columns are stored as their lowercase string values; `as_str` and
//! `FromStr` are the only conversions between the two representations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First name given to a citizen created on first submission.
pub const PLACEHOLDER_FIRST_NAME: &str = "Unknown";

/// Last name given to a citizen created on first submission.
pub const PLACEHOLDER_LAST_NAME: &str = "Citizen";

/// A string did not name any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// The kind of request a citizen files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    /// Postponement of service.
    Deferment,
    /// Voluntary enlistment.
    Enlistment,
}

impl ApplicationType {
    /// Returns the stored string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deferment => "deferment",
            Self::Enlistment => "enlistment",
        }
    }
}

impl FromStr for ApplicationType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deferment" => Ok(Self::Deferment),
            "enlistment" => Ok(Self::Enlistment),
            other => Err(ParseEnumError {
                kind: "application type",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The military branch an applicant asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Army,
    Navy,
    Air,
}

impl Branch {
    /// Returns the stored string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Army => "army",
            Self::Navy => "navy",
            Self::Air => "air",
        }
    }
}

impl FromStr for Branch {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "army" => Ok(Self::Army),
            "navy" => Ok(Self::Navy),
            "air" => Ok(Self::Air),
            other => Err(ParseEnumError {
                kind: "branch",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an application.
///
/// `Pending` is the initial state; `Approved` and `Rejected` are decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl Status {
    /// Returns the stored string value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` once a decision has been recorded.
    #[must_use]
    pub fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseEnumError {
                kind: "status",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person who may submit applications, keyed on `national_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citizen {
    /// Surrogate key.
    pub id: i64,
    /// Display first name.
    pub first_name: String,
    /// Display last name.
    pub last_name: String,
    /// Externally supplied identifier, unique across citizens.
    pub national_id: String,
}

/// A citizen row that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCitizen {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
}

impl NewCitizen {
    /// Builds a citizen with placeholder names for an unseen national ID.
    #[must_use]
    pub fn placeholder(national_id: impl Into<String>) -> Self {
        Self {
            first_name: PLACEHOLDER_FIRST_NAME.to_owned(),
            last_name: PLACEHOLDER_LAST_NAME.to_owned(),
            national_id: national_id.into(),
        }
    }
}

/// One deferment or enlistment request tied to a citizen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// Surrogate key.
    pub id: i64,
    /// Owning citizen.
    pub citizen_id: i64,
    /// Request kind.
    pub application_type: ApplicationType,
    /// Requested branch.
    pub desired_branch: Branch,
    /// Current lifecycle state.
    pub status: Status,
    /// Server-assigned creation time.
    pub submitted_at: DateTime<Utc>,
}

/// An application row that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub citizen_id: i64,
    pub application_type: ApplicationType,
    pub desired_branch: Branch,
    pub status: Status,
    pub submitted_at: DateTime<Utc>,
}
