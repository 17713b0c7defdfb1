//! cashgrep main entry point

use cashgrep_config::Config;
use cashgrep_core::{run_scan, CoreResult, CriteriaInput, ScanContext, SearchCriteria};
use cashgrep_parser::{DefaultGnucashSource, GnucashSource};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "cashgrep")]
#[command(version = "0.1.0")]
#[command(about = "Search and report over a GnuCash ledger export", long_about = None)]
struct Args {
    /// Search term; may repeat, all given terms must match
    #[arg(short = 's', long = "term")]
    terms: Vec<String>,

    /// Exact/prefix date selector: YYYY, YYYY-MM or YYYY-MM-DD
    #[arg(short = 'd', long = "date")]
    date: Option<String>,

    /// Select dates at or after this (possibly partial) date
    #[arg(long)]
    after: Option<String>,

    /// Which transaction date to check: posted, entered or both
    #[arg(long = "date-type")]
    date_type: Option<String>,

    /// Honor case in searches
    #[arg(long)]
    case_sensitive: bool,

    /// Print only the transaction header lines
    #[arg(long)]
    only_transaction_lines: bool,

    /// Produce the running account/month/year subtotal report
    #[arg(long)]
    account_report: bool,

    /// Only select transactions with a split on this account name
    #[arg(long)]
    account: Option<String>,

    /// Dump the account names and stop
    #[arg(long)]
    print_account_names: bool,

    /// Print matched splits as three-field CSV lines
    #[arg(long)]
    csv: bool,

    /// Ledger file to scan (overrides the configuration)
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Soft cap on scanned elements
    #[arg(long)]
    max_elements: Option<u64>,

    /// Configuration file path
    #[arg(short, long, default_value = "cashgrep.yaml")]
    config: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    ExitCode::from(run(&args) as u8)
}

fn run(args: &Args) -> i32 {
    let config = if args.config.exists() {
        match Config::load(&args.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("cashgrep: {}", e);
                return 1;
            }
        }
    } else {
        log::debug!(
            "no configuration file at {}, using defaults",
            args.config.display()
        );
        Config::default()
    };

    let criteria = match build_criteria(args) {
        Ok(criteria) => criteria,
        Err(e) => {
            eprintln!("cashgrep: {}", e);
            if e.is_usage() {
                print_usage();
            }
            return e.exit_code();
        }
    };

    let ledger_path = match args.file.clone().or_else(|| config.data.ledger_file.clone()) {
        Some(path) => path,
        None => {
            eprintln!("cashgrep: no ledger file given");
            eprintln!(
                "Pass -f <file> or set data.ledger_file in {}",
                args.config.display()
            );
            return 1;
        }
    };
    let max_elements = args.max_elements.or(config.scan.max_elements);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = criteria.write_header(&mut out, &ledger_path.display().to_string()) {
        eprintln!("cashgrep: {}", e);
        return 1;
    }

    let source = DefaultGnucashSource;
    let records = match source.read_file(&ledger_path) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("cashgrep: {}", e);
            return 1;
        }
    };

    let mut ctx = ScanContext::new(max_elements);
    match run_scan(records, &criteria, &mut ctx, &mut out) {
        Ok(outcome) => {
            if let Err(e) = out.flush() {
                eprintln!("cashgrep: {}", e);
                return 1;
            }
            log::debug!(
                "done: {} selected, {} evaluated, {} bad fields",
                outcome.selected,
                outcome.evaluated,
                ctx.bad_fields
            );
            0
        }
        Err(e) => {
            eprintln!("cashgrep: {}", e);
            e.exit_code()
        }
    }
}

fn build_criteria(args: &Args) -> CoreResult<SearchCriteria> {
    SearchCriteria::from_input(CriteriaInput {
        terms: args.terms.clone(),
        case_sensitive: args.case_sensitive,
        date_selected: args.date.clone(),
        after_date: args.after.clone(),
        date_field: args.date_type.clone(),
        account_filter: args.account.clone(),
        account_report: args.account_report,
        only_transaction_lines: args.only_transaction_lines,
        csv_output: args.csv,
        print_account_names: args.print_account_names,
    })
}

fn print_usage() {
    eprintln!("Usage: cashgrep [-s term]... [-d date] [--after date]");
    eprintln!("                [--date-type posted|entered|both] [--case-sensitive]");
    eprintln!("                [--only-transaction-lines] [--account-report]");
    eprintln!("                [--account name] [--print-account-names] [--csv]");
    eprintln!("                [-f ledgerfile] [--max-elements n] [-c configfile]");
    eprintln!("Dates must be YYYY-MM-DD or any initial subrange of that");
    eprintln!("('2021-11' for example). All -s terms must match for a");
    eprintln!("transaction to be selected.");
}
