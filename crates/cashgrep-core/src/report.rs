//! Report rendering
//!
//! Consumes the date-sorted selected transactions and writes the report
//! lines. Two mutually exclusive modes: the standard itemized listing
//! with an end-of-run account-total summary, and the account report with
//! running account/month/year subtotals. All totals are accumulated here,
//! owned by the aggregator for the single pass.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use rust_decimal::Decimal;

use cashgrep_utils::{control_scan, truncate};

use crate::criteria::SearchCriteria;
use crate::directory::AccountDirectory;
use crate::error::CoreResult;
use crate::models::{LedgerSplit, WholeTransaction};
use crate::types::ReportMode;

/// Fixed two-decimal rendering used by every amount column
fn fmt2(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Renders selected transactions and accumulates the running totals
pub struct ReportAggregator<'a, W: Write> {
    criteria: &'a SearchCriteria,
    directory: &'a AccountDirectory,
    out: &'a mut W,
    /// Per-account totals for the standard summary, sorted by name
    account_totals: BTreeMap<String, Decimal>,
    last_month: Option<String>,
    last_year: Option<String>,
    month_totals: HashMap<String, Decimal>,
    year_totals: HashMap<String, Decimal>,
    /// Running per-account totals for the account report
    running: HashMap<String, Decimal>,
    bad_fields: usize,
}

impl<'a, W: Write> ReportAggregator<'a, W> {
    pub fn new(
        criteria: &'a SearchCriteria,
        directory: &'a AccountDirectory,
        out: &'a mut W,
    ) -> Self {
        Self {
            criteria,
            directory,
            out,
            account_totals: BTreeMap::new(),
            last_month: None,
            last_year: None,
            month_totals: HashMap::new(),
            year_totals: HashMap::new(),
            running: HashMap::new(),
            bad_fields: 0,
        }
    }

    /// Number of bad-field diagnostics emitted so far
    pub fn bad_fields(&self) -> usize {
        self.bad_fields
    }

    /// Render the whole report for the given selected transactions.
    pub fn render(&mut self, selected: &[WholeTransaction]) -> CoreResult<()> {
        for whole in selected {
            match self.criteria.mode {
                ReportMode::Standard => self.print_standard(whole)?,
                ReportMode::AccountReport => self.print_account_report(whole)?,
            }
        }
        if self.criteria.mode == ReportMode::Standard {
            self.print_totals_summary()?;
        }
        Ok(())
    }

    /// Non-fatal bad-field diagnostic: field name, embedded-newline
    /// count, value, and the owning record's guid on a second line.
    fn diagnose(
        &mut self,
        indent: &str,
        field: &str,
        value: &str,
        id_label: &str,
        id: &str,
    ) -> CoreResult<()> {
        let scan = control_scan(value);
        if scan.tainted {
            self.bad_fields += 1;
            writeln!(self.out, "{}Badfield {} {} {}", indent, scan.newlines, field, value)?;
            writeln!(self.out, "{}{} {}", indent, id_label, id)?;
        }
        Ok(())
    }

    fn print_standard(&mut self, whole: &WholeTransaction) -> CoreResult<()> {
        let trans = &whole.trans;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Trans: p:{} e:{} {:<6} {}",
            trans.posted_day(),
            trans.entered_day(),
            truncate(trans.num.trim(), 6),
            trans.description.trim()
        )?;
        self.diagnose("  ", "transactionnum", &trans.num, "tguid", &trans.id)?;
        self.diagnose("  ", "description", &trans.description, "tguid", &trans.id)?;

        if self.criteria.only_transaction_lines {
            return Ok(());
        }

        // Print the individually matched splits; when only the
        // transaction-level fields matched, fall back to all of them.
        let print_all = whole.marked_split_indices().is_empty();
        for (i, split) in whole.splits.iter().enumerate() {
            if print_all || whole.split_is_marked(i) {
                self.print_split(split)?;
            }
        }
        Ok(())
    }

    fn print_split(&mut self, split: &LedgerSplit) -> CoreResult<()> {
        let display = self.directory.resolve_display_name(&split.account_id)?;
        let account = display.trim().to_string();
        *self.account_totals.entry(account.clone()).or_default() += split.value;

        let memo = split.memo.trim();
        let check_num = split.check_num.trim();
        let value = fmt2(split.value);
        if self.criteria.csv_output {
            writeln!(
                self.out,
                "\"{} {:>24}\",{:>9},\"{}\"",
                check_num, memo, value, account
            )?;
        } else if memo.chars().count() < 26 {
            writeln!(
                self.out,
                "  {:<4} {:<26} {:>9} {:<22}",
                truncate(check_num, 4),
                memo,
                value,
                account
            )?;
        } else {
            writeln!(self.out, "  {:<4} {} ", truncate(check_num, 4), memo)?;
            writeln!(self.out, " {:>33} {:>8} {}", "", value, account)?;
        }
        self.diagnose("   ", "memo", &split.memo, "sguid", &split.id)?;
        self.diagnose("   ", "chknum", &split.check_num, "sguid", &split.id)?;
        Ok(())
    }

    fn print_totals_summary(&mut self) -> CoreResult<()> {
        if self.account_totals.is_empty() {
            return Ok(());
        }
        writeln!(self.out, " account                      total")?;
        for (name, total) in &self.account_totals {
            if total.is_zero() {
                continue;
            }
            writeln!(self.out, "{:<26} {:>7}", name, fmt2(*total))?;
        }
        Ok(())
    }

    fn print_account_report(&mut self, whole: &WholeTransaction) -> CoreResult<()> {
        let trans = &whole.trans;
        let posted_day = trans.posted_day().to_string();
        let entered_day = trans.entered_day().to_string();
        let month = truncate(&posted_day, 7);
        let year = truncate(&posted_day, 4);

        // Flush the previous month's subtotal when the posted month
        // changes; same for the year. The final subtotals are never
        // flushed at end of run.
        match &self.last_month {
            Some(last) if *last != month => {
                let last = last.clone();
                let total = self.month_totals.get(&last).copied().unwrap_or_default();
                writeln!(
                    self.out,
                    "===========Posted Month {} Sum {:>9}",
                    last,
                    fmt2(total)
                )?;
                self.last_month = Some(month.clone());
            }
            Some(_) => {}
            None => self.last_month = Some(month.clone()),
        }
        match &self.last_year {
            Some(last) if *last != year => {
                let last = last.clone();
                let total = self.year_totals.get(&last).copied().unwrap_or_default();
                writeln!(
                    self.out,
                    "===========Posted Year {} Sum {:>9}",
                    last,
                    fmt2(total)
                )?;
                self.last_year = Some(year.clone());
            }
            Some(_) => {}
            None => self.last_year = Some(year.clone()),
        }

        self.diagnose("  ", "transactionnum", &trans.num, "tguid", &trans.id)?;
        self.diagnose("  ", "description", &trans.description, "tguid", &trans.id)?;

        let description = trans.description.trim().to_string();
        for i in whole.marked_split_indices() {
            let split = &whole.splits[i];
            let display = self.directory.resolve_display_name(&split.account_id)?;
            let account = display.trim().to_string();

            // Totals update before the split prints.
            *self.running.entry(account.clone()).or_default() += split.value;
            *self.year_totals.entry(year.clone()).or_default() += split.value;
            *self.month_totals.entry(month.clone()).or_default() += split.value;

            let split_value = fmt2(split.value);
            let running_total = fmt2(self.running[&account]);
            let memo = split.memo.trim();

            let wide = description.chars().count() > 20
                || memo.chars().count() > 20
                || account.chars().count() > 10;
            if wide {
                write!(self.out, "p:{} e:{} ", posted_day, entered_day)?;
                writeln!(self.out, "    {}", description)?;
                if memo.chars().count() <= 20 {
                    write!(
                        self.out,
                        "    {:<15} memo:{:<20}",
                        truncate(&account, 15),
                        memo
                    )?;
                    writeln!(self.out, "{:>37}  {:>9} {:>9}", "", split_value, running_total)?;
                } else {
                    writeln!(self.out, "    {:<15} memo: {}", account, memo)?;
                    writeln!(self.out, "{:>82}  {:>9} {:>9}", "", split_value, running_total)?;
                }
            } else {
                write!(self.out, "p:{} e:{} ", posted_day, entered_day)?;
                writeln!(
                    self.out,
                    "{:<20} {:<15} {:<20} {:>9} {:>9}",
                    truncate(&description, 20),
                    truncate(&account, 15),
                    truncate(memo, 20),
                    split_value,
                    running_total
                )?;
            }
            self.diagnose("   ", "memo", &split.memo, "sguid", &split.id)?;
            self.diagnose("   ", "chknum", &split.check_num, "sguid", &split.id)?;
        }
        Ok(())
    }
}
