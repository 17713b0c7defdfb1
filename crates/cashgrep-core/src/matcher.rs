//! Term matching against transaction and split fields

use crate::criteria::SearchCriteria;
use crate::directory::AccountDirectory;
use crate::error::CoreResult;
use crate::models::{LedgerSplit, LedgerTransaction};
use crate::types::ReportMode;

/// Outcome of scanning one split against the criteria
#[derive(Debug, Clone, Default)]
pub struct SplitScan {
    /// Indices of the terms this split satisfies
    pub term_hits: Vec<usize>,
    /// The split's account equals the account filter
    pub filter_hit: bool,
}

impl SplitScan {
    /// The split is individually matched, by terms or by the filter
    pub fn is_match(&self) -> bool {
        self.filter_hit || !self.term_hits.is_empty()
    }
}

/// Evaluates case-folded substring containment of the search terms
pub struct TermMatcher<'a> {
    criteria: &'a SearchCriteria,
    directory: &'a AccountDirectory,
}

impl<'a> TermMatcher<'a> {
    pub fn new(criteria: &'a SearchCriteria, directory: &'a AccountDirectory) -> Self {
        Self {
            criteria,
            directory,
        }
    }

    /// Term indices satisfied by the transaction-level fields: the
    /// number, the description, and the entered-date text. A term can
    /// therefore match on the entry timestamp alone.
    pub fn transaction_hits(&self, trans: &LedgerTransaction) -> Vec<usize> {
        let num = self.criteria.fold(&trans.num);
        let description = self.criteria.fold(&trans.description);
        let entered = self.criteria.fold(&trans.entered);

        let mut hits = Vec::new();
        for (i, term) in self.criteria.folded_terms().iter().enumerate() {
            if num.contains(term.as_str())
                || description.contains(term.as_str())
                || entered.contains(term.as_str())
            {
                hits.push(i);
            }
        }
        hits
    }

    /// Scan one split.
    ///
    /// With an account filter set, a split whose resolved display name
    /// equals the folded filter matches unconditionally and its terms are
    /// not consulted; in account-report mode a split that misses the
    /// filter is not term-scanned at all. Otherwise terms are checked
    /// against the memo, the resolved account display name, the formatted
    /// value and the check number.
    pub fn scan_split(&self, split: &LedgerSplit) -> CoreResult<SplitScan> {
        let display = self.directory.resolve_display_name(&split.account_id)?;
        let account = self.criteria.fold(&display);

        if let Some(filter) = &self.criteria.account_filter {
            if account == self.criteria.fold(filter) {
                return Ok(SplitScan {
                    term_hits: Vec::new(),
                    filter_hit: true,
                });
            }
            if self.criteria.mode == ReportMode::AccountReport {
                return Ok(SplitScan::default());
            }
        }

        let memo = self.criteria.fold(&split.memo);
        let value = self.criteria.fold(&split.value.to_string());
        let check_num = self.criteria.fold(&split.check_num);

        let mut hits = Vec::new();
        for (i, term) in self.criteria.folded_terms().iter().enumerate() {
            if memo.contains(term.as_str())
                || account.contains(term.as_str())
                || value.contains(term.as_str())
                || check_num.contains(term.as_str())
            {
                hits.push(i);
            }
        }
        Ok(SplitScan {
            term_hits: hits,
            filter_hit: false,
        })
    }
}
