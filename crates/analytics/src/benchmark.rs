//! Performance relative to the market: the portfolio's 24h change against BTC and
//! ETH, and the simple return over the recorded value history.

use core_types::{AssetHolding, PortfolioSnapshot};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub const BTC_SYMBOL: &str = "BTC";
pub const ETH_SYMBOL: &str = "ETH";

const DAYS_PER_YEAR: u32 = 365;

/// One benchmark's 24h change and how far the portfolio is ahead of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkDelta {
    pub change: Decimal,
    /// Portfolio change minus benchmark change, in percentage points.
    pub diff: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub my_change: Decimal,
    pub btc: BenchmarkDelta,
    pub eth: BenchmarkDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRate {
    /// Percent change from the first to the last recorded value.
    pub total_return: Decimal,
    /// `total_return` scaled to a year, treating each history point as one day.
    pub annualized_return: Decimal,
}

/// Compares the portfolio's 24h change with BTC and ETH.
///
/// A benchmark's change is taken from the first exchange or wallet holding of
/// that symbol; it is zero when the portfolio does not hold it.
pub fn compare_to_benchmarks(snapshot: &PortfolioSnapshot) -> BenchmarkComparison {
    let my_change = snapshot.change_24h;
    let delta = |symbol: &str| {
        let change = first_holding(snapshot, symbol)
            .map(|h| h.change_24h)
            .unwrap_or(Decimal::ZERO);
        BenchmarkDelta {
            change,
            diff: my_change - change,
        }
    };

    BenchmarkComparison {
        my_change,
        btc: delta(BTC_SYMBOL),
        eth: delta(ETH_SYMBOL),
    }
}

fn first_holding<'a>(snapshot: &'a PortfolioSnapshot, symbol: &str) -> Option<&'a AssetHolding> {
    let cex = snapshot.cex_accounts.iter().flat_map(|a| a.holdings.iter());
    let wallets = snapshot.wallet_addresses.iter().flat_map(|w| w.holdings.iter());
    cex.chain(wallets).find(|h| h.symbol.eq_ignore_ascii_case(symbol))
}

/// Total and annualized return over a value history, oldest value first.
///
/// Fewer than two points give a zero return. A zero starting value is treated
/// as 1. Both figures are rounded to two decimals.
pub fn return_rate(history: &[Decimal]) -> ReturnRate {
    let [first, .., last] = history else {
        return ReturnRate::default();
    };
    let (first, last) = (*first, *last);

    let base = if first.is_zero() { Decimal::ONE } else { first };
    let total_return = (last - base) / base * Decimal::ONE_HUNDRED;
    let annualized_return =
        total_return / Decimal::from(history.len()) * Decimal::from(DAYS_PER_YEAR);

    let round = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    ReturnRate {
        total_return: round(total_return),
        annualized_return: round(annualized_return),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CexAccount, WalletAddress};
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, change_24h: Decimal) -> AssetHolding {
        AssetHolding {
            symbol: symbol.to_string(),
            change_24h,
            ..Default::default()
        }
    }

    #[test]
    fn test_benchmarks_use_first_matching_holding() {
        let snapshot = PortfolioSnapshot {
            cex_accounts: vec![CexAccount {
                holdings: vec![holding("SOL", dec!(9)), holding("BTC", dec!(2.5))],
                ..Default::default()
            }],
            wallet_addresses: vec![WalletAddress {
                holdings: vec![holding("btc", dec!(7)), holding("ETH", dec!(-1.2))],
                ..Default::default()
            }],
            change_24h: dec!(1.5),
            ..Default::default()
        };

        let comparison = compare_to_benchmarks(&snapshot);
        assert_eq!(comparison.my_change, dec!(1.5));
        assert_eq!(comparison.btc.change, dec!(2.5));
        assert_eq!(comparison.btc.diff, dec!(-1.0));
        assert_eq!(comparison.eth.change, dec!(-1.2));
        assert_eq!(comparison.eth.diff, dec!(2.7));
    }

    #[test]
    fn test_missing_benchmark_counts_as_flat() {
        let snapshot = PortfolioSnapshot {
            change_24h: dec!(-3),
            ..Default::default()
        };
        let comparison = compare_to_benchmarks(&snapshot);
        assert_eq!(comparison.btc.change, Decimal::ZERO);
        assert_eq!(comparison.btc.diff, dec!(-3));
        assert_eq!(comparison.eth.diff, dec!(-3));
    }

    #[test]
    fn test_return_rate_needs_two_points() {
        assert_eq!(return_rate(&[]), ReturnRate::default());
        assert_eq!(return_rate(&[dec!(1000)]), ReturnRate::default());
    }

    #[test]
    fn test_return_rate() {
        let history = [dec!(1000), dec!(1050), dec!(980), dec!(1100)];
        let rate = return_rate(&history);
        // 10% over four points: 10 / 4 * 365
        assert_eq!(rate.total_return, dec!(10));
        assert_eq!(rate.annualized_return, dec!(912.5));
    }

    #[test]
    fn test_return_rate_rounds_and_handles_zero_start() {
        let rate = return_rate(&[dec!(300), dec!(200), dec!(200)]);
        assert_eq!(rate.total_return, dec!(-33.33));
        assert_eq!(rate.annualized_return, dec!(-4055.56));

        let rate = return_rate(&[Decimal::ZERO, dec!(2)]);
        assert_eq!(rate.total_return, dec!(100));
    }
}
