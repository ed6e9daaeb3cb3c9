use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized lane. Declaration order doubles as the tie-break order when
/// roles with equal game counts are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    #[serde(rename = "JG")]
    Jungle,
    Mid,
    Adc,
    #[serde(rename = "SUP")]
    Support,
    Fill,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JG",
            Role::Mid => "MID",
            Role::Adc => "ADC",
            Role::Support => "SUP",
            Role::Fill => "FILL",
        }
    }
}

impl From<&str> for Role {
    /// Maps a raw `teamPosition` from the match API. Empty or unknown
    /// positions (remakes, off-meta queues) fall back to FILL.
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "TOP" => Role::Top,
            "JUNGLE" | "JG" => Role::Jungle,
            "MIDDLE" | "MID" => Role::Mid,
            "BOTTOM" | "ADC" => Role::Adc,
            "UTILITY" | "SUPPORT" | "SUP" => Role::Support,
            _ => Role::Fill,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
