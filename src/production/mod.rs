//! Production pipeline and the order status engine.
//!
//! Everything in this module is pure: no storage, no clocks (callers pass
//! `now`), no logging.

pub mod error;
pub mod order;
pub mod pipeline;
pub mod status;
pub mod tracking;

pub use error::TrackingError;
pub use order::{NewOrder, OrderPatch, Priority, ProductionOrder, MAX_COLUMN_VALUE};
pub use pipeline::{applicable_stages, Applicability, RequirementFlags, Stage, StageTarget, PIPELINE};
pub use status::{recompute, DerivedStatus, OrderStatus};
pub use tracking::{initialize_tracking, TrackingRecord, TrackingUpdate};
