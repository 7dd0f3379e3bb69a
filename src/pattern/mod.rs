//! Component B — Pattern AST & Factory (§4.B), plus the data-model types
//! it operates over (§3.2-§3.5).

pub mod ast;
pub mod component;
pub mod condition;
pub mod hash;
pub mod pattern;
pub mod template;

pub use ast::{AstFactory, PatternExpression, PriceBarReference, VolatilityAttribute};
pub use component::{ComponentType, PriceComponentDescriptor};
pub use condition::{ComparisonOperator, PatternCondition};
pub use pattern::{MarketEntry, PatternDescription, PriceActionLabPattern, ProfitTarget, StopLoss};
pub use template::PatternTemplate;
