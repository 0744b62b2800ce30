use thiserror::Error;

/// Failures raised while applying a tracking update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    #[error("Order not found")]
    OrderNotFound(String),

    #[error("Process not found")]
    StageNotFound { order_id: String, stage: String },
}
