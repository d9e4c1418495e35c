pub mod executor;
pub mod filter_builder;
pub mod lookup;
pub mod shaper;
pub mod validation;
