use super::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Manually reported arrival status of a dignitary.
///
/// The wire form is the display label (`"Reaching in 5 min"`), matching what the
/// board shows; snake_case names are accepted on input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    #[serde(rename = "Not Started", alias = "not_started")]
    NotStarted,
    #[serde(rename = "Started", alias = "started")]
    Started,
    #[serde(rename = "Reaching in 10 min", alias = "reaching_in_10_min")]
    ReachingIn10Min,
    #[serde(rename = "Reaching in 5 min", alias = "reaching_in_5_min")]
    ReachingIn5Min,
    #[serde(rename = "Reached", alias = "reached")]
    Reached,
}

impl Status {
    /// Forward progression order.
    pub const ALL: [Status; 5] = [
        Status::NotStarted,
        Status::Started,
        Status::ReachingIn10Min,
        Status::ReachingIn5Min,
        Status::Reached,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::Started => "Started",
            Status::ReachingIn10Min => "Reaching in 10 min",
            Status::ReachingIn5Min => "Reaching in 5 min",
            Status::Reached => "Reached",
        }
    }

    /// Display urgency: lower sorts first.
    pub fn priority(self) -> u8 {
        match self {
            Status::ReachingIn5Min => 0,
            Status::ReachingIn10Min => 1,
            Status::Started => 2,
            Status::NotStarted => 3,
            Status::Reached => 4,
        }
    }

    /// Next step of the expected progression; `Reached` stays `Reached`.
    pub fn next(self) -> Status {
        match self {
            Status::NotStarted => Status::Started,
            Status::Started => Status::ReachingIn10Min,
            Status::ReachingIn10Min => Status::ReachingIn5Min,
            Status::ReachingIn5Min | Status::Reached => Status::Reached,
        }
    }

    /// Previous step of the progression; `NotStarted` stays `NotStarted`.
    pub fn previous(self) -> Status {
        match self {
            Status::NotStarted | Status::Started => Status::NotStarted,
            Status::ReachingIn10Min => Status::Started,
            Status::ReachingIn5Min => Status::ReachingIn10Min,
            Status::Reached => Status::ReachingIn5Min,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = TrackerError;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        Status::ALL
            .into_iter()
            .find(|status| status.label().to_ascii_lowercase() == normalized)
            .ok_or_else(|| TrackerError::validation(format!("unknown status '{raw}'")))
    }
}

/// Client-selected role. Trusted as reported; it only decides which actions the
/// surfaces offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "liaisonOfficer", alias = "lo")]
    LiaisonOfficer,
}

impl Role {
    /// Add, full-form edit and delete.
    pub fn can_manage_records(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_edit_inline(self) -> bool {
        true
    }

    pub fn toggled(self) -> Role {
        match self {
            Role::Admin => Role::LiaisonOfficer,
            Role::LiaisonOfficer => Role::Admin,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin Access",
            Role::LiaisonOfficer => "LO Access",
        }
    }
}

impl FromStr for Role {
    type Err = TrackerError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "lo" | "liaisonofficer" | "liaison_officer" | "liaison-officer" => {
                Ok(Role::LiaisonOfficer)
            }
            other => Err(TrackerError::validation(format!(
                "role must be one of: admin, lo (got '{other}')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Tile,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> ViewMode {
        match self {
            ViewMode::Tile => ViewMode::List,
            ViewMode::List => ViewMode::Tile,
        }
    }
}
