use core_types::{CurrencyRates, PortfolioSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformCategory {
    Cex,
    Blockchain,
    Manual,
    Defi,
    Nft,
}

impl PlatformCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PlatformCategory::Cex => "Exchanges",
            PlatformCategory::Blockchain => "Wallets",
            PlatformCategory::Manual => "Manual assets",
            PlatformCategory::Defi => "DeFi",
            PlatformCategory::Nft => "NFTs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: PlatformCategory,
    pub value: Decimal,
    /// Share of the grand total, 0-100.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDistribution {
    pub categories: Vec<CategoryShare>,
    pub total: Decimal,
}

/// Splits the portfolio total across platform categories.
///
/// The four core categories are always listed. NFTs appear only when the user
/// counts them towards the total and they carry a value.
pub fn platform_distribution(
    snapshot: &PortfolioSnapshot,
    rates: &CurrencyRates,
) -> PlatformDistribution {
    let mut values = vec![
        (PlatformCategory::Cex, snapshot.cex_total()),
        (PlatformCategory::Blockchain, snapshot.blockchain_total()),
        (PlatformCategory::Manual, snapshot.manual_total(rates)),
        (PlatformCategory::Defi, snapshot.defi_value),
    ];
    let nft = snapshot.counted_nft_value();
    if nft > Decimal::ZERO {
        values.push((PlatformCategory::Nft, nft));
    }

    let total: Decimal = values.iter().map(|(_, v)| *v).sum();
    let categories = values
        .into_iter()
        .map(|(category, value)| CategoryShare {
            category,
            value,
            percentage: if total > Decimal::ZERO {
                value / total * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            },
        })
        .collect();

    PlatformDistribution { categories, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CexAccount, ManualAsset, WalletAddress};
    use rust_decimal_macros::dec;

    fn snapshot() -> PortfolioSnapshot {
        PortfolioSnapshot {
            cex_accounts: vec![CexAccount {
                balance: dec!(400),
                ..Default::default()
            }],
            wallet_addresses: vec![WalletAddress {
                balance: dec!(300),
                ..Default::default()
            }],
            manual_assets: vec![ManualAsset {
                currency: "CNY".to_string(),
                balance: dec!(1000),
                ..Default::default()
            }],
            defi_value: dec!(160),
            nft_floor_value: dec!(100),
            ..Default::default()
        }
    }

    #[test]
    fn test_distribution_excludes_nft_by_default() {
        let dist = platform_distribution(&snapshot(), &CurrencyRates::default());

        assert_eq!(dist.total, dec!(1000));
        assert_eq!(dist.categories.len(), 4);
        assert_eq!(dist.categories[0].percentage, dec!(40));
        assert_eq!(dist.categories[2].value, dec!(140));
        assert_eq!(dist.categories[3].percentage, dec!(16));
    }

    #[test]
    fn test_distribution_includes_nft_when_enabled() {
        let mut snapshot = snapshot();
        snapshot.include_nft_in_total = true;

        let dist = platform_distribution(&snapshot, &CurrencyRates::default());
        assert_eq!(dist.total, dec!(1100));
        assert_eq!(dist.categories.last().unwrap().category, PlatformCategory::Nft);
        assert_eq!(dist.total, snapshot.total_value(&CurrencyRates::default()));
    }

    #[test]
    fn test_empty_snapshot_has_zero_percentages() {
        let dist = platform_distribution(&PortfolioSnapshot::default(), &CurrencyRates::default());
        assert_eq!(dist.total, Decimal::ZERO);
        assert!(dist.categories.iter().all(|c| c.percentage.is_zero()));
    }
}
