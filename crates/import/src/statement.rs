use bolso_core::{Money, TransactionKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

/// Column layout of a bank statement export. The bank emits a single fixed
/// format; the default carries that layout, and overrides never touch the
/// parser itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLayout {
    pub delimiter: String,
    pub date_column: usize,
    pub description_column: usize,
    pub amount_column: usize,
    pub date_format: String,
    /// Currency token stripped from the amount field before parsing.
    pub currency_prefix: String,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            delimiter: ";".to_string(),
            date_column: 0,
            description_column: 1,
            amount_column: 2,
            date_format: "%d/%m/%Y".to_string(),
            currency_prefix: "R$".to_string(),
        }
    }
}

/// One normalized statement line: magnitude and direction split apart,
/// not yet classified.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementEntry {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub kind: TransactionKind,
}

#[derive(Error, Debug)]
pub enum LineError {
    #[error("expected at least {expected} fields, got {got}")]
    TooFewFields { expected: usize, got: usize },
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Lazy, single-pass reader over a statement document. The first line is
/// always consumed as a header and never validated. Lines that fail to
/// normalize are logged and skipped; they never abort the batch.
pub struct StatementReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    layout: StatementLayout,
}

impl<R: Read> StatementReader<R> {
    pub fn new(data: R, layout: StatementLayout) -> Self {
        let delimiter = layout.delimiter.as_bytes().first().copied().unwrap_or(b';');
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(data);
        Self {
            records: reader.into_records(),
            layout,
        }
    }
}

impl<R: Read> Iterator for StatementReader<R> {
    type Item = StatementEntry;

    fn next(&mut self) -> Option<StatementEntry> {
        loop {
            match self.records.next()? {
                Ok(record) => {
                    if record.is_empty() || record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }
                    match parse_record(&record, &self.layout) {
                        Ok(entry) => return Some(entry),
                        Err(reason) => {
                            let raw = record
                                .iter()
                                .collect::<Vec<_>>()
                                .join(self.layout.delimiter.as_str());
                            tracing::warn!(line = %raw, %reason, "skipping statement line");
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping undecodable statement line");
                }
            }
        }
    }
}

fn parse_record(
    record: &csv::StringRecord,
    layout: &StatementLayout,
) -> Result<StatementEntry, LineError> {
    let expected = layout
        .date_column
        .max(layout.description_column)
        .max(layout.amount_column)
        + 1;
    if record.len() < expected {
        return Err(LineError::TooFewFields {
            expected,
            got: record.len(),
        });
    }

    let date = parse_date(
        record.get(layout.date_column).unwrap_or_default(),
        &layout.date_format,
    )?;
    let description = record
        .get(layout.description_column)
        .unwrap_or_default()
        .trim()
        .to_string();
    let (amount, kind) = parse_amount(
        record.get(layout.amount_column).unwrap_or_default(),
        &layout.currency_prefix,
    )?;

    Ok(StatementEntry {
        date,
        description,
        amount,
        kind,
    })
}

fn parse_date(s: &str, format: &str) -> Result<NaiveDate, LineError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, format).map_err(|_| LineError::InvalidDate(s.to_string()))
}

/// Normalizes a Brazilian-locale amount string: currency token removed,
/// `.` is a thousands separator, `,` is the decimal separator. The sign
/// becomes the transaction kind and the magnitude becomes the amount.
fn parse_amount(s: &str, currency_prefix: &str) -> Result<(Money, TransactionKind), LineError> {
    let cleaned = s.replace(currency_prefix, "");
    let cleaned = cleaned.replace('.', "").replace(',', ".");
    let cleaned = cleaned.trim();

    let value =
        Decimal::from_str(cleaned).map_err(|_| LineError::InvalidAmount(s.trim().to_string()))?;

    let kind = if value.is_sign_negative() {
        TransactionKind::Expense
    } else {
        TransactionKind::Income
    };

    Ok((Money::from_decimal(value.abs()), kind))
}
