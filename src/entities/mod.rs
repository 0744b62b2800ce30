//! SeaORM entities for the persisted tables.

pub mod production_order;
pub mod project;
pub mod setting;
