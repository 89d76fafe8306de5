//! Severity mapping for summary categories.
//!
//! Summary items arrive with an optional explicit severity and a category
//! variant used for styling. The explicit value wins when it is one we know;
//! otherwise the variant decides, and anything unknown is neutral.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Auspicious,
    Inauspicious,
    #[default]
    Neutral,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Auspicious => "auspicious",
            Severity::Inauspicious => "inauspicious",
            Severity::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auspicious" => Ok(Severity::Auspicious),
            "inauspicious" => Ok(Severity::Inauspicious),
            "neutral" => Ok(Severity::Neutral),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

/// Resolve the severity shown for a summary item.
///
/// Never fails: an unrecognized explicit severity is ignored and an
/// unrecognized (or missing) variant maps to [`Severity::Neutral`].
pub fn map_variant_to_severity(explicit: Option<&str>, variant: Option<&str>) -> Severity {
    if let Some(severity) = explicit.and_then(|s| s.parse::<Severity>().ok()) {
        return severity;
    }

    variant
        .and_then(|v| v.parse::<Severity>().ok())
        .unwrap_or(Severity::Neutral)
}
