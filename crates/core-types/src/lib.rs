pub mod enums;
pub mod error;
pub mod flatten;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ManualAssetKind, SourceType, TransactionType};
pub use error::CoreError;
pub use flatten::{flatten_crypto_holdings, flatten_holdings};
pub use structs::{
    AssetHolding, CexAccount, CurrencyRates, Fee, Holding, ManualAsset, PortfolioSnapshot,
    Transaction, TransferLeg, WalletAddress,
};
