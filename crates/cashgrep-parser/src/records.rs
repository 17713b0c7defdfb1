//! Typed ledger records produced by the reader

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Record with the source line it started on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpannedRecord {
    pub data: LedgerRecord,
    /// 1-indexed line of the record's opening tag
    pub line: usize,
}

/// Main record enum.
///
/// The document interleaves account records and transaction records as
/// siblings; accounts always precede the transactions that reference them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LedgerRecord {
    Account(AccountRecord),
    Transaction(TransactionRecord),
}

/// One account declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account guid
    pub id: String,
    pub name: String,
    /// GnuCash account type text (BANK, INCOME, ROOT, ...)
    pub kind: String,
    /// Parent account guid, if any
    pub parent_id: Option<String>,
}

/// One transaction with its splits in document order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction guid
    pub id: String,
    /// Posted date-time text, timezone stripped ("YYYY-MM-DD HH:MM:SS")
    pub posted: String,
    /// Entered date-time text, timezone stripped
    pub entered: String,
    /// Transaction number field
    pub num: String,
    pub description: String,
    pub splits: Vec<SplitRecord>,
}

/// One split line of a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRecord {
    /// Split guid
    pub id: String,
    pub memo: String,
    /// Monetary value, normalized from the source's rational encoding
    pub value: Decimal,
    /// The "action" field, used as the check number in entries
    pub check_num: String,
    /// Guid of the account this split posts to
    pub account_id: String,
}
