use crate::error::ExportError;
use crate::{csv_writer, finish_csv};
use core_types::Transaction;

const HEADERS: [&str; 13] = [
    "Date",
    "Time",
    "Type",
    "From Asset",
    "From Amount",
    "To Asset",
    "To Amount",
    "Fee",
    "Fee Currency",
    "Source",
    "Source Type",
    "Chain",
    "Note",
];

/// Renders the transaction history as CSV, one line per transaction.
///
/// Dates and times are rendered in UTC.
pub fn to_csv(transactions: &[Transaction]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv_writer();
    writer.write_record(HEADERS)?;

    for tx in transactions {
        let (fee_amount, fee_currency) = match &tx.fee {
            Some(fee) => (fee.amount.normalize().to_string(), fee.currency.clone()),
            None => ("0".to_string(), String::new()),
        };
        writer.write_record([
            tx.timestamp.format("%Y-%m-%d").to_string(),
            tx.timestamp.format("%H:%M").to_string(),
            tx.kind.to_string(),
            tx.from.symbol.clone(),
            tx.from.amount.normalize().to_string(),
            tx.to.symbol.clone(),
            tx.to.amount.normalize().to_string(),
            fee_amount,
            fee_currency,
            tx.source.clone(),
            tx.source_type.to_string(),
            tx.chain.clone().unwrap_or_default(),
            tx.note.clone().unwrap_or_default(),
        ])?;
    }

    tracing::debug!(count = transactions.len(), "Transactions rendered as CSV.");
    finish_csv(writer)
}
