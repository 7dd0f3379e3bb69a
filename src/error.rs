//! Typed error taxonomy for the pattern, resampling, bootstrap and
//! correction subsystems. Each subsystem gets its own `thiserror` enum so
//! callers can match on the failure kind instead of parsing strings;
//! anything that crosses an I/O or CLI boundary gets wrapped in
//! `anyhow::Error` with added context at the call site.

use thiserror::Error;

/// Errors raised while building, hashing or evaluating pattern expressions (§4.B).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PatternError {
    #[error("unknown expression node encountered while evaluating max bar lookback")]
    UnknownExpressionNode,

    #[error("comparison of incompatible units: {lhs} vs {rhs}")]
    IncompatibleUnits { lhs: String, rhs: String },

    #[error("pattern template has no conditions")]
    EmptyTemplate,

    #[error("bar offset {offset} exceeds the maximum of {max}")]
    BarOffsetOutOfRange { offset: u16, max: u16 },
}

/// Errors raised while enumerating or (de)serializing pattern universes (§4.C, §3.8).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CodecError {
    #[error("bad magic number: expected 0x{expected:08X}, found 0x{found:08X}")]
    BadMagic { expected: u32, found: u32 },

    #[error("unsupported universe file version: {0}")]
    UnsupportedVersion(u32),

    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    #[error("truncated condition bytes for pattern {pattern_index}")]
    TruncatedCondition { pattern_index: usize },

    #[error("name bytes are not valid UTF-8 for pattern {pattern_index}")]
    InvalidName { pattern_index: usize },
}

/// Errors raised by the resampling primitives (§4.D).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ResamplingError {
    #[error("source series is empty")]
    EmptySource,

    #[error("requested sample count must be > 0")]
    ZeroSampleCount,

    #[error("mean block length must be >= 1, got {0}")]
    InvalidBlockLength(u32),
}

/// Errors raised by the BCa bootstrap and bounded-drawdown engines (§4.E).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BootstrapError {
    #[error("input return series is empty")]
    EmptyReturns,

    #[error("bootstrap replicate count must be > 0")]
    ZeroReplicates,

    #[error("confidence level must lie in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),

    #[error("percentile p must lie in [0, 1], got {0}")]
    InvalidPercentile(f64),

    #[error("nTrades must be > 0")]
    InvalidTradeCount,

    #[error("nReps must be > 0")]
    InvalidReplicateCount,
}

/// Errors raised by the multiple-testing correction engine (§4.F).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CorrectionError {
    #[error("correctForMultipleTests called with no strategies registered")]
    NoStrategies,

    #[error("empty synthetic null with a non-empty strategy set is undefined")]
    EmptyNullWithStrategies,

    #[error("significance level alpha must lie in (0, 1), got {0}")]
    InvalidAlpha(f64),
}
