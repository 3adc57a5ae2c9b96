use crate::dimensions::{score_cash_buffer, score_concentration, score_platforms, score_volatility};
use crate::error::AnalyticsError;
use crate::report::{DimensionId, DimensionScore, Grade, HealthScore};
use configuration::Scoring;
use core_types::Holding;
use rust_decimal::Decimal;
use std::collections::HashSet;

const NO_DATA_ADVICE: &str = "No asset data yet. Add accounts or assets to get a health assessment.";
const HEALTHY_ADVICE: &str = "Allocation looks healthy. Keep following the current strategy.";

/// A stateless calculator for the portfolio health score.
///
/// It holds only the scoring parameters, so the same holdings always produce the
/// same `HealthScore`. Callers recompute whenever their holdings change.
#[derive(Debug, Clone)]
pub struct HealthScoreEngine {
    stablecoins: HashSet<String>,
    high_cap: HashSet<String>,
    params: Scoring,
}

impl HealthScoreEngine {
    /// Creates a new engine with the given scoring parameters.
    pub fn new(params: Scoring) -> Result<Self, AnalyticsError> {
        if params.cash_buffer_target <= Decimal::ZERO || params.high_cap_target <= Decimal::ZERO {
            return Err(AnalyticsError::InvalidParameters(
                "ratio targets must be greater than 0".to_string(),
            ));
        }
        if params.concentration_free_ratio < Decimal::ZERO
            || params.concentration_free_ratio >= Decimal::ONE
        {
            return Err(AnalyticsError::InvalidParameters(
                "concentration_free_ratio must be in [0, 1)".to_string(),
            ));
        }
        if params.platform_target == 0 {
            return Err(AnalyticsError::InvalidParameters(
                "platform_target must be at least 1".to_string(),
            ));
        }
        Ok(Self::from_params(params))
    }

    fn from_params(params: Scoring) -> Self {
        let stablecoins: HashSet<String> =
            params.stablecoins.iter().map(|s| s.to_uppercase()).collect();
        // High-cap covers the blue chips plus every stablecoin.
        let high_cap = params
            .blue_chips
            .iter()
            .map(|s| s.to_uppercase())
            .chain(stablecoins.iter().cloned())
            .collect();
        Self {
            stablecoins,
            high_cap,
            params,
        }
    }

    /// The main entry point: scores a flattened list of holdings.
    ///
    /// A portfolio with no holdings or no value takes the no-data branch: every
    /// dimension scores zero, the grade is `Danger` and there is no weakest
    /// dimension.
    pub fn calculate(&self, holdings: &[Holding]) -> HealthScore {
        let total_value: Decimal = holdings.iter().map(|h| h.value).sum();
        let has_data = total_value > Decimal::ZERO && !holdings.is_empty();

        if !has_data {
            return Self::no_data();
        }

        let dimensions = vec![
            score_cash_buffer(
                holdings,
                total_value,
                &self.stablecoins,
                self.params.cash_buffer_target,
            ),
            score_concentration(holdings, total_value, self.params.concentration_free_ratio),
            score_platforms(holdings, self.params.platform_target),
            score_volatility(
                holdings,
                total_value,
                &self.high_cap,
                self.params.high_cap_target,
            ),
        ];

        let total: u32 = dimensions.iter().map(|d| d.score).sum();
        let grade = Grade::from_total(total);
        let weakest = find_weakest(&dimensions);

        let mut advice: Vec<String> = dimensions
            .iter()
            .filter_map(|d| d.suggestion.clone())
            .collect();
        if advice.is_empty() {
            advice.push(HEALTHY_ADVICE.to_string());
        }

        tracing::debug!(total, %grade, weakest = ?weakest, "Health score calculated.");

        HealthScore {
            total,
            grade,
            has_data,
            dimensions,
            weakest,
            advice,
        }
    }

    fn no_data() -> HealthScore {
        HealthScore {
            total: 0,
            grade: Grade::from_total(0),
            has_data: false,
            dimensions: [
                DimensionId::CashBuffer,
                DimensionId::Concentration,
                DimensionId::Platform,
                DimensionId::Volatility,
            ]
            .into_iter()
            .map(DimensionScore::empty)
            .collect(),
            weakest: None,
            advice: vec![NO_DATA_ADVICE.to_string()],
        }
    }
}

impl Default for HealthScoreEngine {
    fn default() -> Self {
        Self::from_params(Scoring::default())
    }
}

/// The dimension with the lowest earned ratio, first one winning ties.
/// Returns `None` when every dimension is at full marks.
fn find_weakest(dimensions: &[DimensionScore]) -> Option<DimensionId> {
    let mut weakest = None;
    let mut min_ratio = Decimal::ONE;
    for d in dimensions {
        let ratio = d.ratio();
        if ratio < min_ratio {
            min_ratio = ratio;
            weakest = Some(d.id);
        }
    }
    weakest
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::SourceType;
    use rust_decimal_macros::dec;

    fn h(symbol: &str, value: Decimal, source: &str) -> Holding {
        Holding::new(symbol, value, source, SourceType::Cex)
    }

    #[test]
    fn test_empty_holdings_take_no_data_branch() {
        let score = HealthScoreEngine::default().calculate(&[]);

        assert_eq!(score.total, 0);
        assert_eq!(score.grade, Grade::Danger);
        assert!(!score.has_data);
        assert!(score.weakest.is_none());
        assert_eq!(score.dimensions.len(), 4);
        assert!(score.dimensions.iter().all(|d| d.score == 0));
        assert_eq!(score.advice, vec![NO_DATA_ADVICE.to_string()]);
    }

    #[test]
    fn test_zero_value_holdings_take_no_data_branch() {
        let holdings = vec![h("BTC", Decimal::ZERO, "A")];
        let score = HealthScoreEngine::default().calculate(&holdings);
        assert!(!score.has_data);
        assert_eq!(score.total, 0);
    }

    #[test]
    fn test_reference_scenario() {
        let holdings = vec![h("USDC", dec!(200), "A"), h("BTC", dec!(800), "B")];
        let score = HealthScoreEngine::default().calculate(&holdings);

        let points: Vec<u32> = score.dimensions.iter().map(|d| d.score).collect();
        assert_eq!(points, vec![25, 8, 13, 25]);
        assert_eq!(score.total, 71);
        assert_eq!(score.grade, Grade::Good);
        assert_eq!(score.weakest, Some(DimensionId::Concentration));
        assert_eq!(
            score.dimension(DimensionId::Concentration).unwrap().metric,
            dec!(0.8)
        );
    }

    #[test]
    fn test_all_stablecoin_portfolio_maxes_cash_and_volatility() {
        let holdings = vec![
            h("USDC", dec!(100), "A"),
            h("USDT", dec!(100), "B"),
            h("DAI", dec!(100), "C"),
        ];
        let score = HealthScoreEngine::default().calculate(&holdings);

        assert_eq!(score.dimension(DimensionId::CashBuffer).unwrap().score, 25);
        assert_eq!(score.dimension(DimensionId::Volatility).unwrap().score, 25);
    }

    #[test]
    fn test_single_symbol_portfolio_has_zero_concentration() {
        let holdings = vec![h("DOGE", dec!(100), "A"), h("doge", dec!(50), "B")];
        let score = HealthScoreEngine::default().calculate(&holdings);
        assert_eq!(score.dimension(DimensionId::Concentration).unwrap().score, 0);
    }

    #[test]
    fn test_three_sources_max_platform_score() {
        let holdings = vec![
            h("BTC", dec!(100), "Binance"),
            h("ETH", dec!(100), "OKX"),
            h("SOL", dec!(100), "Ledger"),
        ];
        let score = HealthScoreEngine::default().calculate(&holdings);
        assert_eq!(score.dimension(DimensionId::Platform).unwrap().score, 20);
    }

    #[test]
    fn test_perfect_portfolio_has_no_weakest() {
        let holdings = vec![
            h("USDC", dec!(25), "A"),
            h("BTC", dec!(25), "B"),
            h("ETH", dec!(25), "C"),
            h("USDT", dec!(25), "A"),
        ];
        let score = HealthScoreEngine::default().calculate(&holdings);

        assert_eq!(score.total, 100);
        assert_eq!(score.grade, Grade::Excellent);
        assert!(score.weakest.is_none());
        assert_eq!(score.advice, vec![HEALTHY_ADVICE.to_string()]);
    }

    #[test]
    fn test_total_is_sum_of_dimensions_and_bounded() {
        let holdings = vec![
            h("BTC", dec!(1234.5), "A"),
            h("PEPE", dec!(99.1), "B"),
            h("USDT", dec!(10), "B"),
        ];
        let score = HealthScoreEngine::default().calculate(&holdings);

        let sum: u32 = score.dimensions.iter().map(|d| d.score).sum();
        assert_eq!(score.total, sum);
        for d in &score.dimensions {
            assert!(d.score <= d.max_score);
        }
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let engine = HealthScoreEngine::default();
        let holdings = vec![h("ETH", dec!(700), "A"), h("LINK", dec!(300), "B")];
        assert_eq!(engine.calculate(&holdings), engine.calculate(&holdings));
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        let params = Scoring {
            platform_target: 0,
            ..Scoring::default()
        };
        assert!(HealthScoreEngine::new(params).is_err());

        let params = Scoring {
            concentration_free_ratio: Decimal::ONE,
            ..Scoring::default()
        };
        assert!(HealthScoreEngine::new(params).is_err());
    }

    #[test]
    fn test_custom_blue_chips_count_towards_volatility() {
        let params = Scoring {
            blue_chips: vec!["sol".to_string()],
            ..Scoring::default()
        };
        let engine = HealthScoreEngine::new(params).unwrap();
        let holdings = vec![h("SOL", dec!(100), "A")];

        let score = engine.calculate(&holdings);
        assert_eq!(score.dimension(DimensionId::Volatility).unwrap().score, 25);
    }
}
