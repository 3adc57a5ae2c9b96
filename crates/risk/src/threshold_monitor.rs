use crate::error::RiskError;
use crate::{AlertScope, RiskAlert, RiskMonitor};
use analytics::HealthScore;
use configuration::Alerts;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const DEFAULT_ADVICE: &str = "Keep an eye on diversification across assets and platforms.";

/// A simple, concrete implementation of the `RiskMonitor` trait.
///
/// Raises a portfolio alert when the total falls below the threshold, and one
/// alert per dimension whose earned share of points falls below the same
/// threshold expressed as a fraction.
#[derive(Debug, Clone)]
pub struct ThresholdMonitor {
    threshold: Decimal,
}

impl ThresholdMonitor {
    /// Creates a new `ThresholdMonitor` from the alert configuration.
    pub fn new(params: &Alerts) -> Result<Self, RiskError> {
        let threshold = params.score_threshold;
        if threshold < dec!(0) || threshold > dec!(100) {
            return Err(RiskError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> Decimal {
        self.threshold
    }
}

impl RiskMonitor for ThresholdMonitor {
    fn evaluate(&self, score: &HealthScore) -> Vec<RiskAlert> {
        // Nothing to assess for an empty portfolio.
        if !score.has_data {
            return Vec::new();
        }

        let mut alerts = Vec::new();

        if Decimal::from(score.total) < self.threshold {
            let weakest = score
                .weakest
                .map(|d| d.label().to_string())
                .unwrap_or_else(|| "none".to_string());
            let advice = score
                .advice
                .first()
                .map(String::as_str)
                .unwrap_or(DEFAULT_ADVICE);

            alerts.push(RiskAlert {
                scope: AlertScope::Portfolio,
                title: "Risk alert".to_string(),
                message: format!(
                    "Portfolio health score {} ({}), weakest dimension: {}. {}",
                    score.total, score.grade, weakest, advice
                ),
            });
        }

        let dimension_floor = self.threshold / dec!(100);
        for dimension in &score.dimensions {
            let Some(suggestion) = &dimension.suggestion else {
                continue;
            };
            if dimension.ratio() < dimension_floor {
                alerts.push(RiskAlert {
                    scope: AlertScope::Dimension(dimension.id),
                    title: "Risk dimension alert".to_string(),
                    message: format!(
                        "{} scores {}/{}. {}",
                        dimension.id.label(),
                        dimension.score,
                        dimension.max_score,
                        suggestion
                    ),
                });
            }
        }

        for alert in &alerts {
            tracing::warn!(scope = ?alert.scope, "{}", alert.message);
        }

        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{DimensionId, HealthScoreEngine};
    use core_types::{Holding, SourceType};

    fn monitor() -> ThresholdMonitor {
        ThresholdMonitor::new(&Alerts::default()).unwrap()
    }

    fn h(symbol: &str, value: Decimal, source: &str) -> Holding {
        Holding::new(symbol, value, source, SourceType::Cex)
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let params = Alerts {
            score_threshold: dec!(101),
        };
        assert!(ThresholdMonitor::new(&params).is_err());
    }

    #[test]
    fn test_no_alerts_without_data() {
        let score = HealthScoreEngine::default().calculate(&[]);
        assert!(monitor().evaluate(&score).is_empty());
    }

    #[test]
    fn test_risky_portfolio_raises_portfolio_and_dimension_alerts() {
        // One meme coin on one exchange: 0 + 0 + 7 + 0 = 7 points.
        let score = HealthScoreEngine::default().calculate(&[h("PEPE", dec!(1000), "A")]);
        let alerts = monitor().evaluate(&score);

        assert_eq!(alerts[0].scope, AlertScope::Portfolio);
        assert!(alerts[0].message.contains("Portfolio health score 7 (danger)"));

        let dimensions: Vec<AlertScope> = alerts[1..].iter().map(|a| a.scope).collect();
        assert_eq!(
            dimensions,
            vec![
                AlertScope::Dimension(DimensionId::CashBuffer),
                AlertScope::Dimension(DimensionId::Concentration),
                AlertScope::Dimension(DimensionId::Platform),
                AlertScope::Dimension(DimensionId::Volatility),
            ]
        );
    }

    #[test]
    fn test_good_portfolio_only_flags_weak_dimensions() {
        // The reference mix scores 71: above the threshold, but concentration is 8/30.
        let score = HealthScoreEngine::default()
            .calculate(&[h("USDC", dec!(200), "A"), h("BTC", dec!(800), "B")]);
        let alerts = monitor().evaluate(&score);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].scope, AlertScope::Dimension(DimensionId::Concentration));
        assert!(alerts[0].message.starts_with("Concentration scores 8/30."));
    }

    #[test]
    fn test_zero_threshold_silences_alerts() {
        let monitor = ThresholdMonitor::new(&Alerts {
            score_threshold: Decimal::ZERO,
        })
        .unwrap();
        let score = HealthScoreEngine::default().calculate(&[h("PEPE", dec!(1000), "A")]);
        assert!(monitor.evaluate(&score).is_empty());
    }
}
