use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Task lifecycle label. A free-form tag with no enforced transition order:
/// any status may change to any other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl Status {
    /// The SQL/wire label for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Parse an optional label from a request body. A missing label falls
    /// back to the default; an unknown one is a validation error.
    pub fn from_label(label: Option<&str>) -> Result<Self, ValidationError> {
        match label {
            None => Ok(Self::default()),
            Some(s) => s.parse().map_err(|_| ValidationError::InvalidStatus),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(format!("unknown status: {other}")),
        }
    }
}
