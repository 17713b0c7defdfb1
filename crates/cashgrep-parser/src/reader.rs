//! GnuCash XML reader
//!
//! A line-based scanner over the uncompressed XML text of a GnuCash
//! export. The writer emits one element per line, which keeps a full XML
//! stack unnecessary: each line is classified as a simple element, an
//! opening tag, or a closing tag, and a small scope machine collects the
//! fields of account, transaction and split groups. Namespace prefixes
//! (`gnc:`, `act:`, `trn:`, `split:`, `ts:`) are ignored; only the local
//! element name matters.

use rust_decimal::Decimal;

use crate::error::ParseError;
use crate::rational::parse_rational;
use crate::records::{AccountRecord, LedgerRecord, SpannedRecord, SplitRecord, TransactionRecord};

/// Simple line-based reader for GnuCash XML files
pub struct SimpleGnucashReader;

/// One classified input line
enum Line {
    /// `<tag attrs>text</tag>` on a single line
    Simple {
        name: String,
        attrs: String,
        text: String,
    },
    /// `<tag attrs>` opening a multi-line group
    Open { name: String },
    /// `</tag>`
    Close { name: String },
    /// Declaration, comment, self-closing or blank line
    Other,
}

fn classify(line: &str) -> Line {
    let trimmed = line.trim();
    if trimmed.is_empty()
        || trimmed.starts_with("<?")
        || trimmed.starts_with("<!--")
        || trimmed.ends_with("/>")
    {
        return Line::Other;
    }

    static SIMPLE: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let simple = SIMPLE.get_or_init(|| {
        regex::Regex::new(
            r"^<(?:[A-Za-z0-9_.-]+:)?([A-Za-z0-9_.-]+)((?:\s[^>]*)?)>(.*)</(?:[A-Za-z0-9_.-]+:)?([A-Za-z0-9_.-]+)>$",
        )
        .unwrap()
    });
    if let Some(caps) = simple.captures(trimmed) {
        let open = caps.get(1).unwrap().as_str();
        let close = caps.get(4).unwrap().as_str();
        if open == close {
            return Line::Simple {
                name: open.to_string(),
                attrs: caps.get(2).unwrap().as_str().to_string(),
                text: decode_entities(caps.get(3).unwrap().as_str()),
            };
        }
        return Line::Other;
    }

    static OPEN: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let open = OPEN.get_or_init(|| {
        regex::Regex::new(r"^<(?:[A-Za-z0-9_.-]+:)?([A-Za-z0-9_.-]+)((?:\s[^>]*)?)>$").unwrap()
    });
    if let Some(caps) = open.captures(trimmed) {
        return Line::Open {
            name: caps.get(1).unwrap().as_str().to_string(),
        };
    }

    static CLOSE: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let close = CLOSE
        .get_or_init(|| regex::Regex::new(r"^</(?:[A-Za-z0-9_.-]+:)?([A-Za-z0-9_.-]+)>$").unwrap());
    if let Some(caps) = close.captures(trimmed) {
        return Line::Close {
            name: caps.get(1).unwrap().as_str().to_string(),
        };
    }

    Line::Other
}

/// Value of a `type="..."` attribute, if present
fn attr_type(attrs: &str) -> Option<String> {
    static TYPE_ATTR: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let type_attr =
        TYPE_ATTR.get_or_init(|| regex::Regex::new(r#"type="([^"]*)""#).unwrap());
    type_attr
        .captures(attrs)
        .map(|caps| caps.get(1).unwrap().as_str().to_string())
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Strip the trailing timezone from a GnuCash date-time text:
/// "2021-03-05 00:00:00 -0600" becomes "2021-03-05 00:00:00".
fn date_without_tz(text: &str) -> String {
    let mut words = text.split_whitespace();
    match (words.next(), words.next()) {
        (Some(day), Some(time)) => format!("{} {}", day, time),
        (Some(day), None) => day.to_string(),
        _ => String::new(),
    }
}

#[derive(Default)]
struct AccountBuilder {
    line: usize,
    id: Option<String>,
    name: String,
    kind: String,
    parent_id: Option<String>,
}

impl AccountBuilder {
    fn finish(self) -> Result<SpannedRecord, ParseError> {
        let id = self.id.ok_or_else(|| ParseError::MissingField {
            record: "account".to_string(),
            field: "id".to_string(),
            line: self.line,
        })?;
        Ok(SpannedRecord {
            data: LedgerRecord::Account(AccountRecord {
                id,
                name: self.name,
                kind: self.kind,
                parent_id: self.parent_id,
            }),
            line: self.line,
        })
    }
}

#[derive(Default)]
struct SplitBuilder {
    line: usize,
    id: String,
    memo: String,
    value: Option<Decimal>,
    check_num: String,
    account_id: Option<String>,
}

impl SplitBuilder {
    fn finish(self) -> Result<SplitRecord, ParseError> {
        let missing = |field: &str| ParseError::MissingField {
            record: "split".to_string(),
            field: field.to_string(),
            line: self.line,
        };
        Ok(SplitRecord {
            id: self.id,
            memo: self.memo,
            value: self.value.ok_or_else(|| missing("value"))?,
            check_num: self.check_num,
            account_id: self.account_id.ok_or_else(|| missing("account"))?,
        })
    }
}

#[derive(Clone, Copy)]
enum DateKind {
    Posted,
    Entered,
}

#[derive(Default)]
struct TransactionBuilder {
    line: usize,
    id: String,
    posted: String,
    entered: String,
    num: String,
    description: String,
    splits: Vec<SplitRecord>,
    split: Option<SplitBuilder>,
    date_scope: Option<DateKind>,
}

impl TransactionBuilder {
    fn finish(self) -> SpannedRecord {
        SpannedRecord {
            data: LedgerRecord::Transaction(TransactionRecord {
                id: self.id,
                posted: self.posted,
                entered: self.entered,
                num: self.num,
                description: self.description,
                splits: self.splits,
            }),
            line: self.line,
        }
    }
}

enum Scope {
    Top,
    Account(AccountBuilder),
    Transaction(Box<TransactionBuilder>),
}

impl SimpleGnucashReader {
    /// Read the records of a GnuCash document in document order.
    pub fn read(content: &str) -> Result<Vec<SpannedRecord>, ParseError> {
        let mut records = Vec::new();
        let mut scope = Scope::Top;
        // Depth inside a container we do not interpret (commodity blocks,
        // slots, template transactions). Template transactions must be
        // skipped wholesale: they contain transaction elements that are
        // not part of the ledger proper.
        let mut skip_depth: usize = 0;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = classify(raw);

            if skip_depth > 0 {
                match line {
                    Line::Open { .. } => skip_depth += 1,
                    Line::Close { .. } => skip_depth -= 1,
                    _ => {}
                }
                continue;
            }

            match &mut scope {
                Scope::Top => match line {
                    Line::Open { name } => match name.as_str() {
                        "account" => {
                            scope = Scope::Account(AccountBuilder {
                                line: line_no,
                                ..AccountBuilder::default()
                            });
                        }
                        "transaction" => {
                            scope = Scope::Transaction(Box::new(TransactionBuilder {
                                line: line_no,
                                ..TransactionBuilder::default()
                            }));
                        }
                        "template-transactions" => skip_depth = 1,
                        _ => {}
                    },
                    _ => {}
                },
                Scope::Account(builder) => match line {
                    Line::Simple { name, attrs, text } => match name.as_str() {
                        "name" => builder.name = text,
                        "id" => {
                            if attr_type(&attrs).as_deref() == Some("guid") {
                                builder.id = Some(text);
                            }
                        }
                        "type" => builder.kind = text,
                        "parent" => {
                            if attr_type(&attrs).as_deref() == Some("guid") {
                                builder.parent_id = Some(text);
                            }
                        }
                        _ => {}
                    },
                    Line::Open { .. } => skip_depth = 1,
                    Line::Close { name } if name == "account" => {
                        let builder = std::mem::take(builder);
                        records.push(builder.finish()?);
                        scope = Scope::Top;
                    }
                    _ => {}
                },
                Scope::Transaction(builder) => {
                    if builder.split.is_some() {
                        match line {
                            Line::Simple { name, attrs, text } => {
                                let split = builder.split.as_mut().unwrap();
                                match name.as_str() {
                                    "id" => split.id = text,
                                    "action" => split.check_num = text,
                                    "memo" => split.memo = text,
                                    "value" => {
                                        split.value = Some(parse_rational(&text, line_no)?)
                                    }
                                    "account" => {
                                        if attr_type(&attrs).as_deref() == Some("guid") {
                                            split.account_id = Some(text);
                                        }
                                    }
                                    _ => {}
                                }
                            }
                            Line::Open { .. } => skip_depth = 1,
                            Line::Close { name } if name == "split" => {
                                let split = builder.split.take().unwrap();
                                builder.splits.push(split.finish()?);
                            }
                            _ => {}
                        }
                    } else if builder.date_scope.is_some() {
                        match line {
                            Line::Simple { name, text, .. } if name == "date" => {
                                match builder.date_scope.unwrap() {
                                    DateKind::Posted => builder.posted = date_without_tz(&text),
                                    DateKind::Entered => builder.entered = date_without_tz(&text),
                                }
                            }
                            Line::Close { name }
                                if name == "date-posted" || name == "date-entered" =>
                            {
                                builder.date_scope = None;
                            }
                            _ => {}
                        }
                    } else {
                        match line {
                            Line::Simple { name, attrs, text } => match name.as_str() {
                                "id" => {
                                    if attr_type(&attrs).as_deref() == Some("guid") {
                                        builder.id = text;
                                    }
                                }
                                "num" => builder.num = text,
                                "description" => builder.description = text,
                                _ => {}
                            },
                            Line::Open { name } => match name.as_str() {
                                "date-posted" => builder.date_scope = Some(DateKind::Posted),
                                "date-entered" => builder.date_scope = Some(DateKind::Entered),
                                "splits" => {}
                                "split" => {
                                    builder.split = Some(SplitBuilder {
                                        line: line_no,
                                        ..SplitBuilder::default()
                                    });
                                }
                                _ => skip_depth = 1,
                            },
                            Line::Close { name } if name == "transaction" => {
                                let builder = std::mem::take(builder);
                                records.push(builder.finish());
                                scope = Scope::Top;
                            }
                            _ => {}
                        }
                    }
                }
            }
        }

        match scope {
            Scope::Top => {
                if skip_depth > 0 {
                    return Err(ParseError::SyntaxError {
                        line: content.lines().count(),
                        message: "unterminated group at end of document".to_string(),
                    });
                }
                Ok(records)
            }
            Scope::Account(builder) => Err(ParseError::SyntaxError {
                line: builder.line,
                message: "unterminated account group".to_string(),
            }),
            Scope::Transaction(builder) => Err(ParseError::SyntaxError {
                line: builder.line,
                message: "unterminated transaction group".to_string(),
            }),
        }
    }
}
