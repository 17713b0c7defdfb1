//! Error types for cashgrep-parser

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("Missing required field {field} in {record} at line {line}")]
    MissingField {
        record: String,
        field: String,
        line: usize,
    },

    #[error("Bad amount {value:?} at line {line}")]
    BadAmount { value: String, line: usize },

    #[error("IO error")]
    IoError(#[from] io::Error),
}
