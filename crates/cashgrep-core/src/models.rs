//! Core data models for the ledger scan

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cashgrep_parser::{AccountRecord, SplitRecord, TransactionRecord};

/// One registered account. Read-only after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Account guid
    pub id: String,
    pub name: String,
    /// GnuCash account type text (BANK, INCOME, ROOT, ...)
    pub kind: String,
    /// Immediate parent guid, if any
    pub parent_id: Option<String>,
}

impl From<AccountRecord> for LedgerAccount {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            kind: record.kind,
            parent_id: record.parent_id,
        }
    }
}

/// The header fields of one transaction. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Transaction guid
    pub id: String,
    /// Posted date-time text ("YYYY-MM-DD HH:MM:SS")
    pub posted: String,
    /// Entered date-time text
    pub entered: String,
    pub num: String,
    pub description: String,
}

impl LedgerTransaction {
    /// Day part of the posted date, or "no-date" when absent
    pub fn posted_day(&self) -> &str {
        self.posted.split_whitespace().next().unwrap_or("no-date")
    }

    /// Day part of the entered date, or "no-date" when absent
    pub fn entered_day(&self) -> &str {
        self.entered.split_whitespace().next().unwrap_or("no-date")
    }
}

/// One split line of a transaction. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSplit {
    /// Split guid
    pub id: String,
    pub memo: String,
    pub value: Decimal,
    pub check_num: String,
    /// Guid of the account this split posts to
    pub account_id: String,
}

impl From<SplitRecord> for LedgerSplit {
    fn from(record: SplitRecord) -> Self {
        Self {
            id: record.id,
            memo: record.memo,
            value: record.value,
            check_num: record.check_num,
            account_id: record.account_id,
        }
    }
}

/// A transaction together with its splits in document order, plus the
/// match flags owned by the evaluator. The split list is never reordered
/// and the flags are set at most once per run.
#[derive(Debug, Clone)]
pub struct WholeTransaction {
    pub trans: LedgerTransaction,
    pub splits: Vec<LedgerSplit>,
    /// Set when the transaction is selected
    pub matched: bool,
    split_matched: Vec<bool>,
}

impl WholeTransaction {
    pub fn new(trans: LedgerTransaction, splits: Vec<LedgerSplit>) -> Self {
        let split_matched = vec![false; splits.len()];
        Self {
            trans,
            splits,
            matched: false,
            split_matched,
        }
    }

    /// Flag one split as individually matched
    pub fn mark_split(&mut self, index: usize) {
        self.split_matched[index] = true;
    }

    pub fn split_is_marked(&self, index: usize) -> bool {
        self.split_matched[index]
    }

    /// Indices of individually matched splits, in document order
    pub fn marked_split_indices(&self) -> Vec<usize> {
        self.split_matched
            .iter()
            .enumerate()
            .filter_map(|(i, m)| if *m { Some(i) } else { None })
            .collect()
    }
}

impl From<TransactionRecord> for WholeTransaction {
    fn from(record: TransactionRecord) -> Self {
        let trans = LedgerTransaction {
            id: record.id,
            posted: record.posted,
            entered: record.entered,
            num: record.num,
            description: record.description,
        };
        let splits = record.splits.into_iter().map(LedgerSplit::from).collect();
        Self::new(trans, splits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(posted: &str, entered: &str) -> LedgerTransaction {
        LedgerTransaction {
            id: "t1".to_string(),
            posted: posted.to_string(),
            entered: entered.to_string(),
            num: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_posted_day() {
        let t = transaction("2021-03-05 00:00:00", "2021-03-04 10:11:12");
        assert_eq!(t.posted_day(), "2021-03-05");
        assert_eq!(t.entered_day(), "2021-03-04");
    }

    #[test]
    fn test_missing_date_falls_back() {
        let t = transaction("", "");
        assert_eq!(t.posted_day(), "no-date");
        assert_eq!(t.entered_day(), "no-date");
    }

    #[test]
    fn test_split_marks() {
        let splits = vec![
            LedgerSplit {
                id: "s1".to_string(),
                memo: String::new(),
                value: Decimal::new(25, 2),
                check_num: String::new(),
                account_id: "a".to_string(),
            },
            LedgerSplit {
                id: "s2".to_string(),
                memo: String::new(),
                value: Decimal::new(-25, 2),
                check_num: String::new(),
                account_id: "b".to_string(),
            },
        ];
        let mut whole = WholeTransaction::new(transaction("", ""), splits);
        assert!(whole.marked_split_indices().is_empty());
        whole.mark_split(1);
        assert!(!whole.split_is_marked(0));
        assert!(whole.split_is_marked(1));
        assert_eq!(whole.marked_split_indices(), vec![1]);
    }
}
