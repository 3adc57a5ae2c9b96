use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of platform a holding is custodied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Cex,
    Blockchain,
    Manual,
}

impl SourceType {
    /// Returns the lowercase identifier used in exports and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Cex => "cex",
            SourceType::Blockchain => "blockchain",
            SourceType::Manual => "manual",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualAssetKind {
    #[default]
    Cash,
    Bank,
    Stock,
    Fund,
    /// Anything else, including the empty type the backend stores by default.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buy,
    Sell,
    Transfer,
    Swap,
    Deposit,
    Withdraw,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "buy",
            TransactionType::Sell => "sell",
            TransactionType::Transfer => "transfer",
            TransactionType::Swap => "swap",
            TransactionType::Deposit => "deposit",
            TransactionType::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
