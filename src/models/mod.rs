//! Domain models for the risk prediction service.

pub mod patient;

use serde::Serialize;

/// Binary risk classification returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    High,
}

impl From<bool> for RiskLevel {
    fn from(high: bool) -> Self {
        if high {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}
