//! Pattern discovery and statistical validation core for price-action trading
//! research.
//!
//! Six components compose the pipeline: a deterministic decimal layer
//! ([`decimal`]), a pattern AST and condition/template model with canonical
//! hashing ([`pattern`]), a universe generator and binary codec
//! ([`universe`]), resampling primitives for IID, stationary-block and
//! trade-level bootstraps ([`resampling`]), BCa bootstrap confidence
//! intervals and bounded-drawdown fractiles ([`bootstrap`]), and
//! multiple-testing correction via Romano-Wolf stepdown and the Masters
//! permutation driver ([`correction`]). [`config`] and [`executor`] supply
//! the run configuration and fan-out strategy shared across all of them;
//! [`analysis_db`] persists cross-run pattern bookkeeping.

pub mod analysis_db;
pub mod bootstrap;
pub mod config;
pub mod correction;
pub mod decimal;
pub mod error;
pub mod executor;
pub mod pattern;
pub mod resampling;
pub mod statistics;
pub mod universe;
