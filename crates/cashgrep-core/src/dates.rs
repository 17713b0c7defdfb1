//! Date decomposition and range predicates
//!
//! Dates are matched on up to three string components [year, month, day]
//! taken from the day part of the date text. Components are zero-padded
//! in the source, so string comparison orders like numeric comparison.

use std::cmp::Ordering;

use crate::criteria::SearchCriteria;
use crate::error::{CoreError, CoreResult};
use crate::types::DateField;

/// Decomposed candidate date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    parts: Vec<String>,
}

impl DateParts {
    /// Decompose the first ten characters of a date text ("YYYY-MM-DD...")
    /// into its components. Absent or short texts yield fewer components.
    pub fn decompose(text: &str) -> Self {
        let day: String = text.chars().take(10).collect();
        let parts = day
            .split('-')
            .filter(|p| !p.is_empty())
            .take(3)
            .map(|p| p.to_string())
            .collect();
        Self { parts }
    }

    pub fn components(&self) -> &[String] {
        &self.parts
    }
}

/// A validated partial date selector: YYYY, YYYY-MM or YYYY-MM-DD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSelector {
    parts: Vec<String>,
    raw: String,
}

impl DateSelector {
    /// Parse and validate a selector string. Component widths are fixed
    /// (4-digit year, 2-digit month and day) and must be numeric.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidDateSelector {
            value: text.to_string(),
        };

        if text.len() < 4 {
            return Err(invalid());
        }
        let parts: Vec<&str> = text.split('-').collect();
        if parts.len() > 3 {
            return Err(invalid());
        }
        for (i, part) in parts.iter().enumerate() {
            let expected = if i == 0 { 4 } else { 2 };
            if part.len() != expected || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
        }

        Ok(Self {
            parts: parts.iter().map(|p| p.to_string()).collect(),
            raw: text.to_string(),
        })
    }

    pub fn components(&self) -> &[String] {
        &self.parts
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// True when every component present in the selector equals the
/// corresponding candidate component. An empty selector matches
/// everything.
pub fn prefix_match(candidate: &DateParts, selector: &[String]) -> bool {
    for (i, wanted) in selector.iter().enumerate() {
        match candidate.parts.get(i) {
            Some(got) if got == wanted => {}
            _ => return false,
        }
    }
    true
}

/// True when the candidate is at or after the (possibly partial)
/// selector date.
///
/// This is a three-level rule that is deliberately not symmetric with
/// [`prefix_match`]: at each level a strictly earlier selector component
/// matches, a strictly later one does not, and equality either matches
/// (when the selector ends at this level) or defers to the next level.
/// A candidate too short to compare at a needed level does not match.
pub fn after_or_equal(candidate: &DateParts, selector: &[String]) -> bool {
    let sel_year = match selector.first() {
        Some(y) => y,
        None => return true,
    };
    let cand_year = match candidate.parts.first() {
        Some(y) => y,
        None => return false,
    };
    match sel_year.cmp(cand_year) {
        Ordering::Less => return true,
        Ordering::Greater => return false,
        Ordering::Equal => {
            if selector.len() < 2 {
                return true;
            }
        }
    }

    let cand_month = match candidate.parts.get(1) {
        Some(m) => m,
        None => return false,
    };
    match selector[1].cmp(cand_month) {
        Ordering::Less => return true,
        Ordering::Greater => return false,
        Ordering::Equal => {
            if selector.len() < 3 {
                return true;
            }
        }
    }

    let cand_day = match candidate.parts.get(2) {
        Some(d) => d,
        None => return false,
    };
    selector[2].as_str() <= cand_day.as_str()
}

fn date_passes(criteria: &SearchCriteria, text: &str) -> bool {
    let candidate = DateParts::decompose(text);
    if let Some(selected) = &criteria.date_selected {
        return prefix_match(&candidate, selected.components());
    }
    if let Some(after) = &criteria.after_date {
        return after_or_equal(&candidate, after.components());
    }
    true
}

/// Check the active date criterion against the criteria's date field:
/// posted only, entered only, or (default) pass when either date
/// individually satisfies it. With no selector set this always passes.
pub fn date_in_range(criteria: &SearchCriteria, posted: &str, entered: &str) -> bool {
    match criteria.date_field {
        DateField::Posted => date_passes(criteria, posted),
        DateField::Entered => date_passes(criteria, entered),
        DateField::Either => date_passes(criteria, posted) || date_passes(criteria, entered),
    }
}
