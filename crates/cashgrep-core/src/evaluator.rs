//! Per-transaction selection
//!
//! A small state machine per transaction:
//! `Pending -> DateRejected` (terminal, no split is ever scanned), or
//! `Pending -> Evaluating -> Selected | Excluded`. Match flags are staged
//! locally while evaluating and applied only on `Selected`, so an
//! excluded transaction never carries flags.

use std::collections::HashSet;

use crate::criteria::SearchCriteria;
use crate::dates;
use crate::directory::AccountDirectory;
use crate::error::CoreResult;
use crate::matcher::TermMatcher;
use crate::models::WholeTransaction;

/// Evaluation states; `evaluate` returns one of the terminal three
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalState {
    Pending,
    DateRejected,
    Evaluating,
    Selected,
    Excluded,
}

/// Decides whether a transaction is selected and which splits matched
pub struct TransactionEvaluator<'a> {
    criteria: &'a SearchCriteria,
    matcher: TermMatcher<'a>,
}

impl<'a> TransactionEvaluator<'a> {
    pub fn new(criteria: &'a SearchCriteria, directory: &'a AccountDirectory) -> Self {
        Self {
            criteria,
            matcher: TermMatcher::new(criteria, directory),
        }
    }

    /// Evaluate one transaction, setting its match flags on selection.
    /// The returned state is always one of the three terminal states.
    pub fn evaluate(&self, whole: &mut WholeTransaction) -> CoreResult<EvalState> {
        if !dates::date_in_range(self.criteria, &whole.trans.posted, &whole.trans.entered) {
            return Ok(EvalState::DateRejected);
        }

        let term_count = self.criteria.folded_terms().len();
        let filter_active = self.criteria.account_filter.is_some();

        let transaction_hits = self.matcher.transaction_hits(&whole.trans);
        let mut satisfied: HashSet<usize> = transaction_hits.into_iter().collect();

        let mut split_marks = vec![false; whole.splits.len()];
        let mut marked_splits = 0usize;
        for (i, split) in whole.splits.iter().enumerate() {
            let scan = self.matcher.scan_split(split)?;
            if scan.is_match() {
                split_marks[i] = true;
                marked_splits += 1;
            }
            if scan.filter_hit {
                // Filter hits select the split on their own; they do not
                // contribute to term satisfaction.
                continue;
            }
            satisfied.extend(scan.term_hits);
        }

        // With a filter the terms are bypassed: at least one split must
        // have matched. Without one, every term must be satisfied
        // somewhere across the transaction and its splits; an empty term
        // list is vacuously satisfied.
        let selected = if filter_active {
            marked_splits > 0
        } else {
            (0..term_count).all(|t| satisfied.contains(&t))
        };

        if !selected {
            return Ok(EvalState::Excluded);
        }

        whole.matched = true;
        for (i, marked) in split_marks.iter().enumerate() {
            if *marked {
                whole.mark_split(i);
            }
        }
        Ok(EvalState::Selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CriteriaInput;
    use crate::models::{LedgerAccount, LedgerSplit, LedgerTransaction};
    use rust_decimal::Decimal;

    fn directory() -> AccountDirectory {
        let mut directory = AccountDirectory::new();
        for (id, name) in [("chk", "Checking"), ("food", "Food"), ("rent", "Rent")] {
            directory.register(LedgerAccount {
                id: id.to_string(),
                name: name.to_string(),
                kind: "BANK".to_string(),
                parent_id: None,
            });
        }
        directory
    }

    fn criteria(input: CriteriaInput) -> SearchCriteria {
        SearchCriteria::from_input(input).unwrap()
    }

    fn split(memo: &str, account_id: &str) -> LedgerSplit {
        LedgerSplit {
            id: "s".to_string(),
            memo: memo.to_string(),
            value: Decimal::new(100, 2),
            check_num: String::new(),
            account_id: account_id.to_string(),
        }
    }

    fn whole(description: &str, splits: Vec<LedgerSplit>) -> WholeTransaction {
        WholeTransaction::new(
            LedgerTransaction {
                id: "t".to_string(),
                posted: "2021-03-05 00:00:00".to_string(),
                entered: "2021-03-04 09:00:00".to_string(),
                num: String::new(),
                description: description.to_string(),
            },
            splits,
        )
    }

    #[test]
    fn test_date_rejection_short_circuits() {
        let criteria = criteria(CriteriaInput {
            date_selected: Some("1999".to_string()),
            terms: vec!["store".to_string()],
            ..CriteriaInput::default()
        });
        let directory = directory();
        let evaluator = TransactionEvaluator::new(&criteria, &directory);
        // The split references an unknown account; date rejection must
        // come first, so no error and no flags.
        let mut w = whole("x", vec![split("store", "ghost")]);
        assert_eq!(evaluator.evaluate(&mut w).unwrap(), EvalState::DateRejected);
        assert!(!w.matched);
    }

    #[test]
    fn test_and_semantics_across_splits() {
        let criteria = criteria(CriteriaInput {
            terms: vec!["alpha".to_string(), "beta".to_string()],
            ..CriteriaInput::default()
        });
        let directory = directory();
        let evaluator = TransactionEvaluator::new(&criteria, &directory);

        // Different terms satisfied by different splits: selected.
        let mut w = whole("", vec![split("alpha here", "chk"), split("beta here", "food")]);
        assert_eq!(evaluator.evaluate(&mut w).unwrap(), EvalState::Selected);
        assert!(w.matched);
        assert_eq!(w.marked_split_indices(), vec![0, 1]);

        // Only one term satisfied anywhere: excluded, nothing flagged.
        let mut w = whole("", vec![split("alpha here", "chk"), split("nothing", "food")]);
        assert_eq!(evaluator.evaluate(&mut w).unwrap(), EvalState::Excluded);
        assert!(!w.matched);
        assert!(w.marked_split_indices().is_empty());
    }

    #[test]
    fn test_term_satisfied_by_transaction_fields() {
        let criteria = criteria(CriteriaInput {
            terms: vec!["groceries".to_string()],
            ..CriteriaInput::default()
        });
        let directory = directory();
        let evaluator = TransactionEvaluator::new(&criteria, &directory);
        let mut w = whole("Groceries run", vec![split("x", "chk")]);
        assert_eq!(evaluator.evaluate(&mut w).unwrap(), EvalState::Selected);
        // The transaction matched but no split did.
        assert!(w.marked_split_indices().is_empty());
    }

    #[test]
    fn test_empty_terms_select_on_date_alone() {
        let criteria = criteria(CriteriaInput::default());
        let directory = directory();
        let evaluator = TransactionEvaluator::new(&criteria, &directory);
        let mut w = whole("anything", vec![split("x", "chk")]);
        assert_eq!(evaluator.evaluate(&mut w).unwrap(), EvalState::Selected);
    }

    #[test]
    fn test_account_report_empty_terms_selected() {
        let criteria = criteria(CriteriaInput {
            account_report: true,
            ..CriteriaInput::default()
        });
        let directory = directory();
        let evaluator = TransactionEvaluator::new(&criteria, &directory);
        let mut w = whole("", vec![split("x", "chk")]);
        assert_eq!(evaluator.evaluate(&mut w).unwrap(), EvalState::Selected);
    }

    #[test]
    fn test_account_filter_selects_on_split_match_only() {
        let criteria = criteria(CriteriaInput {
            terms: vec!["no-such-term".to_string()],
            account_filter: Some("Rent".to_string()),
            ..CriteriaInput::default()
        });
        let directory = directory();
        let evaluator = TransactionEvaluator::new(&criteria, &directory);

        // A split on the filtered account selects the transaction even
        // though the term matches nothing.
        let mut w = whole("", vec![split("x", "rent"), split("y", "chk")]);
        assert_eq!(evaluator.evaluate(&mut w).unwrap(), EvalState::Selected);
        assert_eq!(w.marked_split_indices(), vec![0]);

        // No split on the filtered account and no term hit: excluded.
        let mut w = whole("", vec![split("x", "chk")]);
        assert_eq!(evaluator.evaluate(&mut w).unwrap(), EvalState::Excluded);
    }

    #[test]
    fn test_missing_account_propagates() {
        let criteria = criteria(CriteriaInput::default());
        let directory = directory();
        let evaluator = TransactionEvaluator::new(&criteria, &directory);
        let mut w = whole("", vec![split("x", "ghost")]);
        assert!(evaluator.evaluate(&mut w).is_err());
    }
}
