//! Basic types for the core engine

use serde::{Deserialize, Serialize};

/// Which transaction date a range criterion is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateField {
    /// Only the posted date
    Posted,
    /// Only the entered date
    Entered,
    /// Either date may satisfy the criterion
    Either,
}

impl Default for DateField {
    fn default() -> Self {
        DateField::Either
    }
}

impl std::str::FromStr for DateField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "posted" => Ok(DateField::Posted),
            "entered" => Ok(DateField::Entered),
            "both" | "either" => Ok(DateField::Either),
            _ => Err(format!("Invalid date type: {}", s)),
        }
    }
}

impl std::fmt::Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateField::Posted => write!(f, "posted"),
            DateField::Entered => write!(f, "entered"),
            DateField::Either => write!(f, "both"),
        }
    }
}

/// Report rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Itemized transaction listing with an account-total summary
    Standard,
    /// Running account/month/year subtotals
    AccountReport,
}

impl Default for ReportMode {
    fn default() -> Self {
        ReportMode::Standard
    }
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportMode::Standard => write!(f, "standard"),
            ReportMode::AccountReport => write!(f, "account"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_date_field_from_str() {
        assert_eq!(DateField::from_str("posted").unwrap(), DateField::Posted);
        assert_eq!(DateField::from_str("Entered").unwrap(), DateField::Entered);
        assert_eq!(DateField::from_str("both").unwrap(), DateField::Either);
        assert!(DateField::from_str("sideways").is_err());
    }

    #[test]
    fn test_date_field_default() {
        assert_eq!(DateField::default(), DateField::Either);
    }
}
