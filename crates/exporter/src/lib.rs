//! # AllFi Exporter
//!
//! Turns a portfolio snapshot into downloadable files: holdings as CSV or JSON and
//! the transaction history as CSV. CSV output starts with a UTF-8 byte order mark
//! so spreadsheet tools pick the right encoding for non-ASCII account names.

use chrono::{NaiveDate, Utc};
use configuration::{Export, ExportFormat};
use core_types::{CurrencyRates, PortfolioSnapshot};
use std::fs;
use std::path::PathBuf;

pub mod error;
pub mod holdings;
pub mod transactions;

pub use error::ExportError;
pub use holdings::ExportRow;

/// UTF-8 byte order mark.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Default file stem for an export made on `date`, e.g. `allfi-export-2024-03-01`.
pub fn default_filename(date: NaiveDate) -> String {
    format!("allfi-export-{}", date.format("%Y-%m-%d"))
}

pub(crate) fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv_writer_into(BOM.to_vec())
}

/// A CSV writer that appends to already rendered output.
pub(crate) fn csv_writer_into(buffer: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer)
}

pub(crate) fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Writes export files for a snapshot into the configured output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
    rates: CurrencyRates,
}

impl Exporter {
    pub fn new(settings: &Export, rates: CurrencyRates) -> Self {
        Self {
            output_dir: PathBuf::from(&settings.output_dir),
            rates,
        }
    }

    /// Overrides the configured output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Renders the export in memory.
    pub fn render(
        &self,
        snapshot: &PortfolioSnapshot,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ExportError> {
        let total_value = snapshot.total_value(&self.rates);
        match format {
            ExportFormat::Csv => {
                let rows = holdings::collect_rows(snapshot, total_value);
                holdings::to_csv(&rows, total_value)
            }
            ExportFormat::Json => {
                let rows = holdings::collect_rows(snapshot, total_value);
                let json =
                    holdings::to_json(&rows, total_value, snapshot.change_24h, Utc::now())?;
                Ok(json.into_bytes())
            }
            ExportFormat::Transactions => transactions::to_csv(&snapshot.transactions),
        }
    }

    /// Renders the export and writes it to `<output_dir>/<stem>.<ext>`.
    ///
    /// Returns the path of the written file.
    pub fn export(
        &self,
        snapshot: &PortfolioSnapshot,
        format: ExportFormat,
        stem: &str,
    ) -> Result<PathBuf, ExportError> {
        let content = self.render(snapshot, format)?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self
            .output_dir
            .join(format!("{}.{}", stem, format.extension()));
        fs::write(&path, &content)?;

        tracing::info!(path = %path.display(), bytes = content.len(), ?format, "Export written.");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{AssetHolding, CexAccount};
    use rust_decimal_macros::dec;

    fn snapshot() -> PortfolioSnapshot {
        PortfolioSnapshot {
            cex_accounts: vec![CexAccount {
                name: "OKX".to_string(),
                balance: dec!(1300),
                holdings: vec![AssetHolding {
                    symbol: "USDC".to_string(),
                    name: "USD Coin".to_string(),
                    balance: dec!(1300),
                    price: dec!(1),
                    value: dec!(1300),
                    change_24h: dec!(0),
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(default_filename(date), "allfi-export-2024-03-01");
    }

    #[test]
    fn test_export_writes_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(&Export::default(), CurrencyRates::default())
            .with_output_dir(dir.path().join("out"));

        let csv_path = exporter.export(&snapshot(), ExportFormat::Csv, "holdings").unwrap();
        assert_eq!(csv_path, dir.path().join("out").join("holdings.csv"));
        let csv = fs::read(&csv_path).unwrap();
        assert!(csv.starts_with(BOM));
        assert!(String::from_utf8_lossy(&csv).contains("Total Assets,,,,,,,1300,100%"));

        let json_path = exporter.export(&snapshot(), ExportFormat::Json, "holdings").unwrap();
        assert_eq!(json_path.extension().unwrap(), "json");
        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(&json_path).unwrap()).unwrap();
        assert_eq!(json["holdings"][0]["percentage"], "100.00");

        let tx_path = exporter
            .export(&snapshot(), ExportFormat::Transactions, "history")
            .unwrap();
        assert!(tx_path.ends_with("history.csv"));
    }
}
