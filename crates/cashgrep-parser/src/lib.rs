//! GnuCash ingestion adapter
//!
//! Reads the uncompressed XML text of a GnuCash export into typed ledger
//! records. Decompression is the caller's concern; this crate takes text.

use std::path::Path;

pub mod error;
pub mod rational;
pub mod reader;
pub mod records;

pub use error::ParseError;
pub use rational::parse_rational;
pub use reader::SimpleGnucashReader;

// Re-export commonly used types
pub use records::{AccountRecord, LedgerRecord, SpannedRecord, SplitRecord, TransactionRecord};

/// Trait for ledger record sources
pub trait GnucashSource {
    /// Read records from document text
    fn read(&self, content: &str) -> Result<Vec<SpannedRecord>, ParseError>;

    /// Read records from a file path
    fn read_file(&self, path: &Path) -> Result<Vec<SpannedRecord>, ParseError>;
}

/// Default source implementation backed by [`SimpleGnucashReader`]
#[derive(Debug, Default)]
pub struct DefaultGnucashSource;

impl GnucashSource for DefaultGnucashSource {
    fn read(&self, content: &str) -> Result<Vec<SpannedRecord>, ParseError> {
        let records = SimpleGnucashReader::read(content)?;
        log::debug!("read {} ledger records", records.len());
        Ok(records)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<SpannedRecord>, ParseError> {
        let content = std::fs::read_to_string(path)?;
        log::info!("reading ledger file {}", path.display());
        self.read(&content)
    }
}
