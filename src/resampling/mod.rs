//! Component D — Resampling Primitives (§4.D).

pub mod iid;
pub mod stationary;
pub mod trade;

pub use iid::IidResampler;
pub use stationary::StationaryBlockResampler;
pub use trade::{Trade, TradeFlatteningAdapter};
