use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::common::{created_response, message_response, success_response};
use crate::{
    errors::ServiceError,
    production::{NewOrder, OrderPatch, OrderStatus, TrackingUpdate},
    repositories::OrderFilter,
    AppState,
};

pub const TRACKING_FIELDS_REQUIRED: &str = "Order ID, processId, and trackingData required";

#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Only orders currently in this status
    pub status: Option<OrderStatus>,
    /// Only orders belonging to this project
    pub project_id: Option<String>,
}

/// Body of a tracking update: which stage, and the fields to merge into it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TrackingRequest {
    #[serde(default, rename = "processId", alias = "process_id")]
    #[schema(example = "sanding")]
    pub process_id: Option<String>,
    #[serde(default, rename = "trackingData", alias = "tracking_data")]
    #[schema(value_type = Option<TrackingUpdate>)]
    pub tracking_data: Option<Value>,
}

impl TrackingRequest {
    /// Splits the request into stage name and update, rejecting missing or
    /// empty parts.
    pub fn into_parts(self) -> Result<(String, TrackingUpdate), ServiceError> {
        let required = || ServiceError::BadRequest(TRACKING_FIELDS_REQUIRED.to_string());

        let stage = self
            .process_id
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(required)?;
        let data = self
            .tracking_data
            .filter(|d| !d.is_null())
            .ok_or_else(required)?;

        let update: TrackingUpdate = serde_json::from_value(data)
            .map_err(|e| ServiceError::BadRequest(format!("Invalid trackingData: {}", e)))?;
        if update.is_empty() {
            return Err(required());
        }
        Ok((stage, update))
    }
}

/// List orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders retrieved", body = [crate::production::ProductionOrder]),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let filter = OrderFilter {
        status: query.status,
        project_id: query.project_id,
    };
    let orders = state.services.orders.list_orders(filter).await?;
    Ok(success_response(orders))
}

/// Create order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = NewOrder,
    responses(
        (status = 201, description = "Order created", body = crate::production::ProductionOrder),
        (status = 400, description = "Invalid order", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<NewOrder>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.create_order(payload).await?;
    Ok(created_response(order))
}

/// Get order
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order retrieved", body = crate::production::ProductionOrder),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.get_order(&id).await?;
    Ok(success_response(order))
}

/// Update order fields
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order ID")),
    request_body = OrderPatch,
    responses(
        (status = 200, description = "Order updated", body = crate::production::ProductionOrder),
        (status = 400, description = "Invalid update", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<OrderPatch>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.update_order(&id, patch).await?;
    Ok(success_response(order))
}

/// Delete order
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted", body = super::common::MessageResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.orders.delete_order(&id).await?;
    Ok(message_response("Order deleted successfully"))
}

/// Update one stage's tracking record
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/tracking",
    params(("id" = String, Path, description = "Order ID")),
    request_body = TrackingRequest,
    responses(
        (status = 200, description = "Tracking merged; progress and status recomputed", body = crate::production::ProductionOrder),
        (status = 400, description = "processId or trackingData missing", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order or process not found", body = crate::errors::ErrorResponse),
    ),
    tag = "tracking"
)]
pub async fn update_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TrackingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (stage, update) = request.into_parts()?;
    let order = state
        .services
        .orders
        .update_tracking(&id, &stage, update)
        .await?;
    Ok(success_response(order))
}
