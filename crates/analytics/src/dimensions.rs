//! The four dimension scorers. Each maps one measured share (or count) linearly
//! onto its point range and clamps the result into `[0, max_score]`.
//!
//! A zero total or a degenerate target yields the empty score for that dimension.

use crate::report::{DimensionId, DimensionScore};
use core_types::Holding;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Rounds half away from zero and clamps into `[0, max]`.
pub(crate) fn clamp_points(points: Decimal, max: u32) -> u32 {
    let rounded = points.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded
        .max(Decimal::ZERO)
        .to_u32()
        .unwrap_or(0)
        .min(max)
}

/// Total value of holdings whose upper-cased symbol is in `symbols`.
fn value_in(holdings: &[Holding], symbols: &HashSet<String>) -> Decimal {
    holdings
        .iter()
        .filter(|h| symbols.contains(&h.symbol.to_uppercase()))
        .map(|h| h.value)
        .sum()
}

/// Cash buffer: stablecoin share, full marks at `target`.
pub fn score_cash_buffer(
    holdings: &[Holding],
    total: Decimal,
    stablecoins: &HashSet<String>,
    target: Decimal,
) -> DimensionScore {
    let id = DimensionId::CashBuffer;
    if total <= Decimal::ZERO || target <= Decimal::ZERO {
        return DimensionScore::empty(id);
    }
    let ratio = value_in(holdings, stablecoins) / total;
    let points = ratio / target * Decimal::from(id.max_score());

    let suggestion = if ratio < target / Decimal::TWO {
        Some(format!(
            "Stablecoins are {}% of the portfolio. Build a cash buffer of at least {}% to ride out market swings.",
            percent(ratio),
            percent(target)
        ))
    } else if ratio < target {
        Some("Stablecoin share is slightly low. Consider adding some USDC/USDT.".to_string())
    } else {
        None
    };

    DimensionScore {
        id,
        score: clamp_points(points, id.max_score()),
        max_score: id.max_score(),
        metric: ratio,
        suggestion,
    }
}

/// Concentration: share of the largest single asset (grouped by symbol).
///
/// Full marks up to `free_ratio`, decaying linearly to zero at 100%.
pub fn score_concentration(
    holdings: &[Holding],
    total: Decimal,
    free_ratio: Decimal,
) -> DimensionScore {
    let id = DimensionId::Concentration;
    if total <= Decimal::ZERO || free_ratio >= Decimal::ONE {
        return DimensionScore::empty(id);
    }
    let max = Decimal::from(id.max_score());

    let mut grouped: HashMap<String, Decimal> = HashMap::new();
    for h in holdings {
        *grouped.entry(h.symbol.to_uppercase()).or_default() += h.value;
    }
    let max_value = grouped.values().copied().max().unwrap_or(Decimal::ZERO);
    let max_ratio = max_value / total;

    let score = if max_ratio <= free_ratio {
        id.max_score()
    } else {
        let decay = (max_ratio - free_ratio) / (Decimal::ONE - free_ratio);
        clamp_points(max * (Decimal::ONE - decay), id.max_score())
    };

    let suggestion = if max_ratio > free_ratio * Decimal::TWO {
        Some(format!(
            "A single asset makes up {}% of the portfolio. Diversify to reduce single-asset risk.",
            percent(max_ratio)
        ))
    } else if max_ratio > free_ratio {
        Some("The largest position is a little heavy. Consider spreading allocation further.".to_string())
    } else {
        None
    };

    DimensionScore {
        id,
        score,
        max_score: id.max_score(),
        metric: max_ratio,
        suggestion,
    }
}

/// Platform diversity: number of distinct sources, full marks at `target`.
pub fn score_platforms(holdings: &[Holding], target: u32) -> DimensionScore {
    let id = DimensionId::Platform;
    if target == 0 {
        return DimensionScore::empty(id);
    }
    let sources: HashSet<&str> = holdings.iter().map(|h| h.source.as_str()).collect();
    let count = sources.len();
    let points =
        Decimal::from(count) / Decimal::from(target) * Decimal::from(id.max_score());

    let suggestion = if count < 2 {
        Some("All assets sit on a single platform. Spread them across several to limit platform risk.".to_string())
    } else if count < target as usize {
        Some("Consider using more platforms to further reduce single-platform risk.".to_string())
    } else {
        None
    };

    DimensionScore {
        id,
        score: clamp_points(points, id.max_score()),
        max_score: id.max_score(),
        metric: Decimal::from(count),
        suggestion,
    }
}

/// Volatility: share held in high-cap assets, full marks at `target`.
pub fn score_volatility(
    holdings: &[Holding],
    total: Decimal,
    high_cap: &HashSet<String>,
    target: Decimal,
) -> DimensionScore {
    let id = DimensionId::Volatility;
    if total <= Decimal::ZERO || target <= Decimal::ZERO {
        return DimensionScore::empty(id);
    }
    let ratio = value_in(holdings, high_cap) / total;
    let points = ratio / target * Decimal::from(id.max_score());

    let suggestion = if ratio < target / Decimal::TWO {
        Some(format!(
            "Only {}% sits in blue chips and stablecoins. Increase BTC/ETH exposure to steady the portfolio.",
            percent(ratio)
        ))
    } else if ratio < target {
        Some("Consider raising the share of BTC/ETH a little.".to_string())
    } else {
        None
    };

    DimensionScore {
        id,
        score: clamp_points(points, id.max_score()),
        max_score: id.max_score(),
        metric: ratio,
        suggestion,
    }
}

fn percent(ratio: Decimal) -> Decimal {
    (ratio * Decimal::ONE_HUNDRED).round_dp(1).normalize()
}
