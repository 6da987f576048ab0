//! Reading status of a book

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a book is in the reading lifecycle
///
/// Persisted as a small integer code so the in-memory enum can evolve
/// independently of stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    #[default]
    OnShelf,
    InProgress,
    Completed,
}

impl Status {
    /// Every status, in persisted-code order
    pub const ALL: [Status; 3] = [Status::OnShelf, Status::InProgress, Status::Completed];

    /// Stable persisted code
    pub fn code(self) -> u8 {
        match self {
            Status::OnShelf => 0,
            Status::InProgress => 1,
            Status::Completed => 2,
        }
    }

    /// Icon name shown next to a book in lists
    pub fn icon(self) -> &'static str {
        match self {
            Status::OnShelf => "shelf-icon",
            Status::InProgress => "reading-icon",
            Status::Completed => "done-icon",
        }
    }

    /// Human readable label
    pub fn description(self) -> &'static str {
        match self {
            Status::OnShelf => "on shelf",
            Status::InProgress => "in progress",
            Status::Completed => "completed",
        }
    }
}

/// Icon name for a status
pub fn status_icon(status: Status) -> &'static str {
    status.icon()
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Status::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or_else(|| format!("unknown status code {}", code))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "on shelf" | "onshelf" | "shelf" => Ok(Status::OnShelf),
            "in progress" | "inprogress" | "reading" => Ok(Status::InProgress),
            "completed" | "done" => Ok(Status::Completed),
            _ => Err(format!(
                "unknown status '{}' (expected on-shelf, in-progress or completed)",
                s
            )),
        }
    }
}
