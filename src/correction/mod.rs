//! Component F — Permutation Testing & Multiple-Testing Correction (§4.F).

pub mod masters;
pub mod observer;
pub mod romano_wolf;

pub use masters::{run_masters_validation, CandidateStrategy};
pub use observer::{InMemoryStatisticsCollector, PermutationStatisticsCollector};
pub use romano_wolf::{
    holm_romano_wolf, romano_wolf_stepdown, unadjusted_p_value_selection, CorrectionResult, StrategyStatistic,
};
