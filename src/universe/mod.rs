//! Component C — Pattern Universe Generator & Codec (§4.C, §3.8).

pub mod codec;
pub mod generator;

pub use codec::{read_universe, write_universe, MAGIC, VERSION};
pub use generator::{generate_universe, SearchMode};
