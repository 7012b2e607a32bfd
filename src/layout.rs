//! Spread geometry and the layout catalogue.

pub mod catalogue;
pub mod spread;

pub use catalogue::{LayoutInfo, catalogue, catalogue_json, spread_by_id};
pub use spread::{Placement, Spread, SpreadPlan};
