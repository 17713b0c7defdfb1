//! Search criteria
//!
//! Every "unset" criterion is an explicit `Option` or enum default, never
//! a sentinel value. Raw command-line strings come in through
//! [`CriteriaInput`] and are validated before any scanning begins.

use std::io::Write;
use std::str::FromStr;

use cashgrep_utils::{quote, yes_no};

use crate::dates::DateSelector;
use crate::error::{CoreError, CoreResult};
use crate::types::{DateField, ReportMode};

/// Raw, unvalidated criteria values as they arrive from the front-end
#[derive(Debug, Clone, Default)]
pub struct CriteriaInput {
    pub terms: Vec<String>,
    pub case_sensitive: bool,
    pub date_selected: Option<String>,
    pub after_date: Option<String>,
    pub date_field: Option<String>,
    pub account_filter: Option<String>,
    pub account_report: bool,
    pub only_transaction_lines: bool,
    pub csv_output: bool,
    pub print_account_names: bool,
}

/// Validated search criteria
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    /// Required terms in the order given (kept for display)
    pub terms: Vec<String>,
    /// Case-folded copies used for matching
    folded_terms: Vec<String>,
    pub case_sensitive: bool,
    /// Exact/prefix date criterion; takes precedence over `after_date`
    pub date_selected: Option<DateSelector>,
    /// At-or-after date criterion
    pub after_date: Option<DateSelector>,
    pub date_field: DateField,
    /// Account display name that selects splits unconditionally
    pub account_filter: Option<String>,
    pub mode: ReportMode,
    pub only_transaction_lines: bool,
    pub csv_output: bool,
    pub print_account_names: bool,
}

impl SearchCriteria {
    /// Validate raw input into usable criteria.
    ///
    /// Rejections here are usage errors: the scan never starts.
    pub fn from_input(input: CriteriaInput) -> CoreResult<Self> {
        let date_selected = input
            .date_selected
            .as_deref()
            .map(DateSelector::parse)
            .transpose()?;
        let after_date = input
            .after_date
            .as_deref()
            .map(DateSelector::parse)
            .transpose()?;

        let date_field = match input.date_field.as_deref() {
            None => DateField::default(),
            Some(text) => DateField::from_str(text).map_err(|_| {
                CoreError::InvalidDateTypeSelector {
                    value: text.to_string(),
                }
            })?,
        };

        let account_filter = match input.account_filter {
            None => None,
            Some(name) if name.trim().is_empty() => {
                return Err(CoreError::InvalidAccountSelector {
                    reason: "account name is empty".to_string(),
                });
            }
            Some(name) => Some(name),
        };

        let case_sensitive = input.case_sensitive;
        let folded_terms = input
            .terms
            .iter()
            .map(|t| fold_with(t, case_sensitive))
            .collect();

        Ok(Self {
            terms: input.terms,
            folded_terms,
            case_sensitive,
            date_selected,
            after_date,
            date_field,
            account_filter,
            mode: if input.account_report {
                ReportMode::AccountReport
            } else {
                ReportMode::Standard
            },
            only_transaction_lines: input.only_transaction_lines,
            csv_output: input.csv_output,
            print_account_names: input.print_account_names,
        })
    }

    /// Case-fold a value for matching under these criteria
    pub fn fold(&self, text: &str) -> String {
        fold_with(text, self.case_sensitive)
    }

    /// The folded search terms, index-aligned with `terms`
    pub fn folded_terms(&self) -> &[String] {
        &self.folded_terms
    }

    /// Write the criteria header block that precedes every report.
    pub fn write_header<W: Write>(&self, out: &mut W, source: &str) -> std::io::Result<()> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(out, "Search Date   : {}", now)?;
        writeln!(out, "Search In     : {}", source)?;
        if self.terms.is_empty() {
            writeln!(out, "Searchterms   : none")?;
        } else {
            writeln!(out, "Searchterms   : {}", self.terms.len())?;
            for term in &self.terms {
                writeln!(out, "SearchFor     : {}", quote(term))?;
            }
        }
        writeln!(out, "Casesensitive : {}", yes_no(self.case_sensitive))?;
        let date_type = match self.date_field {
            DateField::Either => "posted and entered checked".to_string(),
            other => other.to_string(),
        };
        writeln!(out, "Date Type     : {}", date_type)?;
        let selected = self
            .date_selected
            .as_ref()
            .map(|s| s.as_str())
            .unwrap_or("");
        writeln!(out, "Date Selected : {}", selected)?;
        let after = self.after_date.as_ref().map(|s| s.as_str()).unwrap_or("");
        writeln!(out, "AllAfterDate  : {}", after)?;
        writeln!(
            out,
            "Trans. Only   : {}",
            yes_no(self.only_transaction_lines)
        )?;
        writeln!(
            out,
            "Account Report: {}",
            yes_no(self.mode == ReportMode::AccountReport)
        )?;
        writeln!(
            out,
            "Report Account: {}",
            self.account_filter.as_deref().unwrap_or("")
        )?;
        writeln!(out, "We truncate the description and memo fields in")?;
        writeln!(out, "the output,so the matching part of a transaction")?;
        writeln!(out, "or split might not show in this report.")?;
        Ok(())
    }
}

fn fold_with(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let criteria = SearchCriteria::from_input(CriteriaInput::default()).unwrap();
        assert!(criteria.terms.is_empty());
        assert_eq!(criteria.date_field, DateField::Either);
        assert_eq!(criteria.mode, ReportMode::Standard);
        assert!(criteria.date_selected.is_none());
        assert!(criteria.after_date.is_none());
    }

    #[test]
    fn test_terms_are_folded_for_matching() {
        let input = CriteriaInput {
            terms: vec!["Grocery".to_string()],
            ..CriteriaInput::default()
        };
        let criteria = SearchCriteria::from_input(input).unwrap();
        assert_eq!(criteria.terms, vec!["Grocery"]);
        assert_eq!(criteria.folded_terms(), &["grocery".to_string()]);
    }

    #[test]
    fn test_case_sensitive_terms_kept() {
        let input = CriteriaInput {
            terms: vec!["Grocery".to_string()],
            case_sensitive: true,
            ..CriteriaInput::default()
        };
        let criteria = SearchCriteria::from_input(input).unwrap();
        assert_eq!(criteria.folded_terms(), &["Grocery".to_string()]);
        assert_eq!(criteria.fold("AbC"), "AbC");
    }

    #[test]
    fn test_bad_date_selector_rejected() {
        let input = CriteriaInput {
            date_selected: Some("03-2021".to_string()),
            ..CriteriaInput::default()
        };
        let err = SearchCriteria::from_input(input).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDateSelector { .. }));
        assert!(err.is_usage());
    }

    #[test]
    fn test_bad_date_type_rejected() {
        let input = CriteriaInput {
            date_field: Some("sideways".to_string()),
            ..CriteriaInput::default()
        };
        assert!(matches!(
            SearchCriteria::from_input(input),
            Err(CoreError::InvalidDateTypeSelector { .. })
        ));
    }

    #[test]
    fn test_empty_account_filter_rejected() {
        let input = CriteriaInput {
            account_filter: Some("  ".to_string()),
            ..CriteriaInput::default()
        };
        assert!(matches!(
            SearchCriteria::from_input(input),
            Err(CoreError::InvalidAccountSelector { .. })
        ));
    }

    #[test]
    fn test_header_block() {
        let input = CriteriaInput {
            terms: vec!["store".to_string()],
            date_selected: Some("2021-03".to_string()),
            ..CriteriaInput::default()
        };
        let criteria = SearchCriteria::from_input(input).unwrap();
        let mut out = Vec::new();
        criteria.write_header(&mut out, "books.gnucash").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Search In     : books.gnucash"));
        assert!(text.contains("Searchterms   : 1"));
        assert!(text.contains("SearchFor     : \"store\""));
        assert!(text.contains("Date Type     : posted and entered checked"));
        assert!(text.contains("Date Selected : 2021-03"));
        assert!(text.contains("Account Report: no"));
    }
}
