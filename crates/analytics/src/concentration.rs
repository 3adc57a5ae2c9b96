use core_types::Holding;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of individually listed assets before the rest fold into "Others".
pub const TOP_N: usize = 5;
pub const OTHERS_SYMBOL: &str = "Others";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcentrationEntry {
    pub symbol: String,
    pub value: Decimal,
    /// Share of total value, 0-100.
    pub percentage: Decimal,
}

/// The largest assets by value plus the Herfindahl-Hirschman index of the whole
/// portfolio.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcentrationReport {
    pub entries: Vec<ConcentrationEntry>,
    /// Sum of squared fractional shares times 10000. 10000 means a single asset.
    pub hhi: u32,
    pub total: Decimal,
}

/// Groups holdings by symbol and summarises how concentrated the portfolio is.
pub fn analyze_concentration(holdings: &[Holding]) -> ConcentrationReport {
    let mut grouped: HashMap<String, Decimal> = HashMap::new();
    for h in holdings {
        *grouped.entry(h.symbol.to_uppercase()).or_default() += h.value;
    }

    let total: Decimal = grouped.values().copied().sum();
    if total <= Decimal::ZERO {
        return ConcentrationReport::default();
    }

    let mut sorted: Vec<(String, Decimal)> = grouped.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let hhi_raw: Decimal = sorted
        .iter()
        .map(|(_, value)| {
            let share = *value / total;
            share * share
        })
        .sum::<Decimal>()
        * Decimal::from(10_000);
    let hhi = hhi_raw
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0);

    let to_entry = |symbol: String, value: Decimal| ConcentrationEntry {
        symbol,
        value,
        percentage: value / total * Decimal::ONE_HUNDRED,
    };

    let others_value: Decimal = sorted.iter().skip(TOP_N).map(|(_, v)| *v).sum();
    let mut entries: Vec<ConcentrationEntry> = sorted
        .into_iter()
        .take(TOP_N)
        .map(|(symbol, value)| to_entry(symbol, value))
        .collect();
    if others_value > Decimal::ZERO {
        entries.push(to_entry(OTHERS_SYMBOL.to_string(), others_value));
    }

    tracing::debug!(hhi, assets = entries.len(), "Concentration analysed.");

    ConcentrationReport {
        entries,
        hhi,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::SourceType;
    use rust_decimal_macros::dec;

    fn h(symbol: &str, value: Decimal) -> Holding {
        Holding::new(symbol, value, "A", SourceType::Blockchain)
    }

    #[test]
    fn test_empty_holdings() {
        let report = analyze_concentration(&[]);
        assert!(report.entries.is_empty());
        assert_eq!(report.hhi, 0);
        assert_eq!(report.total, Decimal::ZERO);
    }

    #[test]
    fn test_single_asset_hhi_is_max() {
        let report = analyze_concentration(&[h("BTC", dec!(10)), h("btc", dec!(5))]);
        assert_eq!(report.hhi, 10_000);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].percentage, dec!(100));
    }

    #[test]
    fn test_two_equal_assets() {
        let report = analyze_concentration(&[h("BTC", dec!(50)), h("ETH", dec!(50))]);
        assert_eq!(report.hhi, 5_000);
        // Equal values are ordered by symbol.
        assert_eq!(report.entries[0].symbol, "BTC");
        assert_eq!(report.entries[1].symbol, "ETH");
    }

    #[test]
    fn test_folds_tail_into_others() {
        let holdings = vec![
            h("A", dec!(60)),
            h("B", dec!(50)),
            h("C", dec!(40)),
            h("D", dec!(30)),
            h("E", dec!(10)),
            h("F", dec!(6)),
            h("G", dec!(4)),
        ];
        let report = analyze_concentration(&holdings);

        assert_eq!(report.total, dec!(200));
        assert_eq!(report.entries.len(), TOP_N + 1);
        let others = report.entries.last().unwrap();
        assert_eq!(others.symbol, OTHERS_SYMBOL);
        assert_eq!(others.value, dec!(10));
        assert_eq!(others.percentage, dec!(5));
        assert_eq!(report.entries[0].symbol, "A");
        assert_eq!(report.entries[0].percentage, dec!(30));
    }

    #[test]
    fn test_no_others_when_five_or_fewer() {
        let holdings: Vec<Holding> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|s| h(s, dec!(20)))
            .collect();
        let report = analyze_concentration(&holdings);
        assert_eq!(report.entries.len(), 5);
        assert_eq!(report.hhi, 2_000);
    }
}
