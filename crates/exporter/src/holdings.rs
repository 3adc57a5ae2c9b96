use crate::error::ExportError;
use crate::{csv_writer, csv_writer_into, finish_csv};
use chrono::{DateTime, Utc};
use core_types::{PortfolioSnapshot, SourceType};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

const HEADERS: [&str; 9] = [
    "Asset",
    "Symbol",
    "Source",
    "Source Type",
    "Price",
    "24h Change",
    "Balance",
    "Value",
    "Percentage",
];

const TOTAL_LABEL: &str = "Total Assets";

/// One exported holding, enriched with its share of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub name: String,
    pub symbol: String,
    pub source: String,
    pub source_type: SourceType,
    pub price: Decimal,
    pub change_24h: Decimal,
    pub balance: Decimal,
    pub value: Decimal,
    /// Share of the total, fixed to two decimals ("0.00" when the total is zero).
    pub percentage: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    exported_at: DateTime<Utc>,
    total_value: Decimal,
    change_24h: Decimal,
    holdings: &'a [ExportRow],
}

/// Collects every exchange and wallet holding as an export row.
///
/// Manual assets have no holding breakdown and are therefore not listed, though
/// they still count towards `total_value`.
pub fn collect_rows(snapshot: &PortfolioSnapshot, total_value: Decimal) -> Vec<ExportRow> {
    let cex = snapshot
        .cex_accounts
        .iter()
        .map(|a| (a.name.as_str(), SourceType::Cex, &a.holdings));
    let wallets = snapshot
        .wallet_addresses
        .iter()
        .map(|w| (w.name.as_str(), SourceType::Blockchain, &w.holdings));

    cex.chain(wallets)
        .flat_map(|(source, source_type, holdings)| {
            holdings.iter().map(move |h| ExportRow {
                name: h.name.clone(),
                symbol: h.symbol.clone(),
                source: source.to_string(),
                source_type,
                price: h.price,
                change_24h: h.change_24h,
                balance: h.balance,
                value: h.value,
                percentage: percentage_of(h.value, total_value),
            })
        })
        .collect()
}

fn percentage_of(value: Decimal, total: Decimal) -> String {
    if total.is_zero() {
        return "0.00".to_string();
    }
    let mut pct = (value / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    pct.rescale(2);
    pct.to_string()
}

fn plain(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Renders the holdings CSV: BOM, header, one line per row, a blank separator and
/// the total line.
pub fn to_csv(rows: &[ExportRow], total_value: Decimal) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv_writer();
    writer.write_record(HEADERS)?;

    for row in rows {
        writer.write_record([
            row.name.clone(),
            row.symbol.clone(),
            row.source.clone(),
            row.source_type.to_string(),
            plain(row.price),
            plain(row.change_24h),
            plain(row.balance),
            plain(row.value),
            format!("{}%", row.percentage),
        ])?;
    }

    // Record length is checked per writer; the blank separator sits between two.
    let mut buffer = finish_csv(writer)?;
    buffer.push(b'\n');

    let mut writer = csv_writer_into(buffer);
    let total = plain(total_value);
    writer.write_record([TOTAL_LABEL, "", "", "", "", "", "", total.as_str(), "100%"])?;

    finish_csv(writer)
}

/// Renders the pretty-printed JSON export document.
pub fn to_json(
    rows: &[ExportRow],
    total_value: Decimal,
    change_24h: Decimal,
    exported_at: DateTime<Utc>,
) -> Result<String, ExportError> {
    let document = ExportDocument {
        exported_at,
        total_value,
        change_24h,
        holdings: rows,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
