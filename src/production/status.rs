//! Derivation of an order's `progress` and `current_status` from its tracking
//! records.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use super::pipeline::{applicable_stages, RequirementFlags};
use super::tracking::TrackingRecord;

/// Coarse lifecycle of an order.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// The two values the engine derives. Never authoritative on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStatus {
    pub progress: u8,
    pub status: OrderStatus,
}

impl Default for DerivedStatus {
    fn default() -> Self {
        Self {
            progress: 0,
            status: OrderStatus::Pending,
        }
    }
}

/// A stage is complete only when its completed quantity equals the order
/// quantity exactly; over-reported quantities do not count.
pub fn is_stage_complete(record: &TrackingRecord, order_quantity: u32) -> bool {
    record.quantity_completed == order_quantity
}

/// Computes progress and status for an order.
///
/// Applicable stages without a matching record count as incomplete. The
/// in-progress check scans every record, including stages the order skips.
pub fn recompute(
    quantity: u32,
    flags: RequirementFlags,
    tracking: &[TrackingRecord],
) -> DerivedStatus {
    let applicable = applicable_stages(flags);

    let completed = applicable
        .iter()
        .filter(|stage| {
            tracking
                .iter()
                .find(|record| record.is_for(**stage))
                .is_some_and(|record| is_stage_complete(record, quantity))
        })
        .count();

    let progress = percent_rounded(completed, applicable.len());

    let status = if completed == applicable.len() {
        OrderStatus::Completed
    } else if tracking.iter().any(TrackingRecord::has_progress) {
        OrderStatus::InProgress
    } else {
        OrderStatus::Pending
    };

    DerivedStatus { progress, status }
}

// round(100 * part / whole) with halves rounded up, in integer arithmetic.
fn percent_rounded(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let scaled = (200 * part + whole) / (2 * whole);
    scaled.min(100) as u8
}
