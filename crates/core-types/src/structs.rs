use crate::enums::{ManualAssetKind, SourceType, TransactionType};
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Reads an explicit JSON `null` as the type's default. Absent keys are covered
/// by the container-level `#[serde(default)]`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single position as reported by an exchange account or an on-chain wallet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetHolding {
    pub symbol: String,
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub balance: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub price: Decimal,
    /// Market value in USD.
    #[serde(deserialize_with = "null_as_default")]
    pub value: Decimal,
    /// 24h price change in percent.
    #[serde(deserialize_with = "null_as_default")]
    pub change_24h: Decimal,
}

/// A centralised exchange account connected through API keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CexAccount {
    pub id: u64,
    pub exchange: String,
    pub name: String,
    /// Account total in USD, as reported by the aggregation API.
    #[serde(deserialize_with = "null_as_default")]
    pub balance: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub holdings: Vec<AssetHolding>,
}

/// A tracked on-chain address.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletAddress {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub blockchain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub balance: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub holdings: Vec<AssetHolding>,
}

/// A manually maintained asset (bank deposit, brokerage account, cash...).
///
/// Unlike exchange accounts and wallets it carries no holding list; its balance
/// is denominated in `currency` and converted to USD on demand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualAsset {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ManualAssetKind,
    pub institution: String,
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub balance: Decimal,
    pub note: String,
}

impl ManualAsset {
    /// The balance expressed in USD using the given conversion table.
    pub fn usd_value(&self, rates: &CurrencyRates) -> Decimal {
        self.balance * rates.to_usd(&self.currency)
    }
}

/// Currency to USD multipliers used to value manual assets.
///
/// Currencies missing from the table convert at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyRates(HashMap<String, Decimal>);

impl CurrencyRates {
    pub fn new(rates: HashMap<String, Decimal>) -> Self {
        Self(rates)
    }

    /// Case-insensitive, since config sources may lowercase map keys.
    pub fn to_usd(&self, currency: &str) -> Decimal {
        self.0
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(currency))
            .map(|(_, rate)| *rate)
            .unwrap_or(Decimal::ONE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.0.iter()
    }
}

impl Default for CurrencyRates {
    fn default() -> Self {
        Self(HashMap::from([("CNY".to_string(), dec!(0.14))]))
    }
}

/// One side of a transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferLeg {
    pub symbol: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fee {
    #[serde(deserialize_with = "null_as_default")]
    pub amount: Decimal,
    pub currency: String,
}

/// A unified transaction record across exchanges, chains and manual entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub from: TransferLeg,
    pub to: TransferLeg,
    #[serde(default)]
    pub fee: Option<Fee>,
    #[serde(default)]
    pub chain: Option<String>,
    pub source: String,
    pub source_type: SourceType,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Everything the aggregation API reports for one user at one point in time.
///
/// All sections are optional on input so partial payloads still deserialize.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioSnapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub cex_accounts: Vec<CexAccount>,
    #[serde(deserialize_with = "null_as_default")]
    pub wallet_addresses: Vec<WalletAddress>,
    #[serde(deserialize_with = "null_as_default")]
    pub manual_assets: Vec<ManualAsset>,
    /// Total value of open DeFi positions.
    #[serde(deserialize_with = "null_as_default")]
    pub defi_value: Decimal,
    /// Summed floor price of held NFTs.
    #[serde(deserialize_with = "null_as_default")]
    pub nft_floor_value: Decimal,
    /// Whether NFTs count towards the portfolio total.
    pub include_nft_in_total: bool,
    /// Portfolio-wide 24h change in percent.
    #[serde(deserialize_with = "null_as_default")]
    pub change_24h: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub transactions: Vec<Transaction>,
    /// Daily total portfolio value in USD, oldest first.
    #[serde(deserialize_with = "null_as_default")]
    pub history: Vec<Decimal>,
}

impl PortfolioSnapshot {
    pub fn from_json(input: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn cex_total(&self) -> Decimal {
        self.cex_accounts.iter().map(|a| a.balance).sum()
    }

    pub fn blockchain_total(&self) -> Decimal {
        self.wallet_addresses.iter().map(|w| w.balance).sum()
    }

    pub fn manual_total(&self, rates: &CurrencyRates) -> Decimal {
        self.manual_assets.iter().map(|m| m.usd_value(rates)).sum()
    }

    /// NFT floor value, or zero when NFTs are excluded from the total.
    pub fn counted_nft_value(&self) -> Decimal {
        if self.include_nft_in_total && self.nft_floor_value > Decimal::ZERO {
            self.nft_floor_value
        } else {
            Decimal::ZERO
        }
    }

    /// Grand total across every category, in USD.
    pub fn total_value(&self, rates: &CurrencyRates) -> Decimal {
        self.cex_total()
            + self.blockchain_total()
            + self.manual_total(rates)
            + self.defi_value
            + self.counted_nft_value()
    }
}

/// A holding flattened out of its account, tagged with where it lives.
///
/// This is the common input shape for every portfolio calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub value: Decimal,
    pub source: String,
    pub source_type: SourceType,
}

impl Holding {
    pub fn new(
        symbol: impl Into<String>,
        value: Decimal,
        source: impl Into<String>,
        source_type: SourceType,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            value,
            source: source.into(),
            source_type,
        }
    }
}
