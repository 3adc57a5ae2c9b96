//! # AllFi Analytics
//!
//! Portfolio-level calculations over flattened holdings: the health score, the
//! concentration report and the platform distribution.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` and the scoring section of `configuration`.
//! - **Stateless Calculation:** Every entry point takes a snapshot of holdings and
//!   returns a fresh result. Nothing is cached, so callers simply recompute when
//!   their data changes.
//!
//! ## Public API
//!
//! - `HealthScoreEngine`: Scores holdings on cash buffer, concentration, platform diversity and volatility.
//! - `HealthScore`: The total, grade, per-dimension breakdown, weakest dimension and advice.
//! - `analyze_concentration`: Top assets plus the HHI.
//! - `platform_distribution`: Value split across exchanges, wallets, manual assets, DeFi and NFTs.
//! - `compare_to_benchmarks` / `return_rate`: 24h change against BTC and ETH, and return over the value history.

// Declare the modules that constitute this crate.
pub mod benchmark;
pub mod concentration;
pub mod dimensions;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use benchmark::{
    compare_to_benchmarks, return_rate, BenchmarkComparison, BenchmarkDelta, ReturnRate,
};
pub use concentration::{analyze_concentration, ConcentrationEntry, ConcentrationReport};
pub use distribution::{platform_distribution, CategoryShare, PlatformCategory, PlatformDistribution};
pub use engine::HealthScoreEngine;
pub use error::AnalyticsError;
pub use report::{DimensionId, DimensionScore, Grade, HealthScore};
