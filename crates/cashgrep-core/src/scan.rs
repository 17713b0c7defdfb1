//! Scan driver
//!
//! One forward pass over the adapter's records: accounts register into
//! the directory, transactions are evaluated immediately. The document
//! guarantees accounts precede the transactions referencing them; the
//! pass relies on that ordering contract. Selected transactions are then
//! sorted globally by (posted, entered) and handed to the aggregator
//! once.

use std::io::Write;

use cashgrep_parser::{LedgerRecord, SpannedRecord};
use cashgrep_utils::quote;

use crate::criteria::SearchCriteria;
use crate::directory::AccountDirectory;
use crate::error::CoreResult;
use crate::evaluator::{EvalState, TransactionEvaluator};
use crate::models::{LedgerAccount, WholeTransaction};
use crate::report::ReportAggregator;

/// Per-run state threaded through the scan; replaces any process-wide
/// counters.
#[derive(Debug, Clone, Default)]
pub struct ScanContext {
    /// Soft cap on scanned records; None is unbounded
    pub max_elements: Option<u64>,
    /// Records consumed so far
    pub elements_seen: u64,
    /// Bad-field diagnostics emitted by the aggregator
    pub bad_fields: usize,
}

impl ScanContext {
    pub fn new(max_elements: Option<u64>) -> Self {
        Self {
            max_elements,
            ..Self::default()
        }
    }
}

/// What a completed run did
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub accounts: usize,
    pub evaluated: usize,
    pub selected: usize,
    /// The element cap stopped the scan early
    pub cap_hit: bool,
    /// The run printed the account-name dump and stopped
    pub dumped_account_names: bool,
}

/// Run a full scan over the records, writing the report to `out`.
pub fn run_scan<W: Write>(
    records: Vec<SpannedRecord>,
    criteria: &SearchCriteria,
    ctx: &mut ScanContext,
    out: &mut W,
) -> CoreResult<ScanOutcome> {
    let mut directory = AccountDirectory::new();
    let mut selected: Vec<WholeTransaction> = Vec::new();
    let mut outcome = ScanOutcome::default();

    for record in records {
        ctx.elements_seen += 1;
        if let Some(cap) = ctx.max_elements {
            if ctx.elements_seen > cap {
                log::warn!("element cap {} reached, stopping scan early", cap);
                outcome.cap_hit = true;
                break;
            }
        }

        match record.data {
            LedgerRecord::Account(account) => {
                directory.register(LedgerAccount::from(account));
            }
            LedgerRecord::Transaction(transaction) => {
                if criteria.print_account_names {
                    print_account_names(&directory, out)?;
                    outcome.dumped_account_names = true;
                    outcome.accounts = directory.len();
                    return Ok(outcome);
                }
                let mut whole = WholeTransaction::from(transaction);
                outcome.evaluated += 1;
                let evaluator = TransactionEvaluator::new(criteria, &directory);
                if evaluator.evaluate(&mut whole)? == EvalState::Selected {
                    selected.push(whole);
                }
            }
        }
    }
    outcome.accounts = directory.len();

    selected.sort_by(|a, b| {
        a.trans
            .posted
            .cmp(&b.trans.posted)
            .then_with(|| a.trans.entered.cmp(&b.trans.entered))
    });

    writeln!(out, "Transactions count {}", selected.len())?;
    let mut aggregator = ReportAggregator::new(criteria, &directory, out);
    aggregator.render(&selected)?;
    ctx.bad_fields = aggregator.bad_fields();
    outcome.selected = selected.len();

    log::info!(
        "scan complete: {} of {} transactions selected across {} accounts",
        outcome.selected,
        outcome.evaluated,
        outcome.accounts
    );
    Ok(outcome)
}

/// Dump the registered account names sorted by name, then stop.
fn print_account_names<W: Write>(directory: &AccountDirectory, out: &mut W) -> CoreResult<()> {
    writeln!(out, "Number of Accounts: {}", directory.len())?;
    if directory.is_empty() {
        writeln!(out, "No account names present")?;
        return Ok(());
    }
    writeln!(out, "#name,type,guid,parentguid")?;
    for account in directory.sorted_by_name() {
        let parent = account.parent_id.as_deref().unwrap_or("");
        writeln!(
            out,
            "{:<20},{:<9},{},{}",
            quote(&account.name),
            quote(&account.kind),
            quote(&account.id),
            quote(parent)
        )?;
    }
    Ok(())
}
