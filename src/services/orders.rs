use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    production::{
        NewOrder, OrderPatch, OrderStatus, ProductionOrder, TrackingError, TrackingUpdate,
    },
    repositories::{OrderFilter, OrderRepository},
};

use super::generate_id;

pub const ORDER_ID_PREFIX: &str = "ORD";

/// Service for production orders and their stage tracking
#[derive(Clone)]
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    event_sender: Arc<EventSender>,
}

impl OrderService {
    pub fn new(repository: Arc<dyn OrderRepository>, event_sender: Arc<EventSender>) -> Self {
        Self {
            repository,
            event_sender,
        }
    }

    /// Creates an order with a fresh tracking collection
    #[instrument(skip(self, input), fields(quantity = input.quantity))]
    pub async fn create_order(&self, input: NewOrder) -> Result<ProductionOrder, ServiceError> {
        input.validate()?;

        let order = ProductionOrder::new(generate_id(ORDER_ID_PREFIX), input, Utc::now());
        self.repository.insert(&order).await?;

        info!(order_id = %order.order_id, "Production order created");
        self.event_sender
            .send_or_log(Event::OrderCreated(order.order_id.clone()))
            .await;

        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        filter: OrderFilter,
    ) -> Result<Vec<ProductionOrder>, ServiceError> {
        self.repository.list(&filter).await
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: &str) -> Result<ProductionOrder, ServiceError> {
        self.repository
            .find(order_id)
            .await?
            .ok_or_else(ServiceError::order_not_found)
    }

    /// Applies a partial update to the order's own fields
    #[instrument(skip(self, patch), fields(order_id = %order_id))]
    pub async fn update_order(
        &self,
        order_id: &str,
        patch: OrderPatch,
    ) -> Result<ProductionOrder, ServiceError> {
        patch.validate()?;

        let mut order = self.get_order(order_id).await?;
        let old_status = order.current_status;
        order.apply_patch(patch, Utc::now());

        if !self.repository.save(&order).await? {
            return Err(ServiceError::order_not_found());
        }

        self.event_sender
            .send_or_log(Event::OrderUpdated(order.order_id.clone()))
            .await;
        self.announce_status_change(&order, old_status).await;

        Ok(order)
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_order(&self, order_id: &str) -> Result<(), ServiceError> {
        if !self.repository.delete(order_id).await? {
            return Err(ServiceError::order_not_found());
        }

        info!("Production order deleted");
        self.event_sender
            .send_or_log(Event::OrderDeleted(order_id.to_string()))
            .await;
        Ok(())
    }

    /// Merges `update` into the order's record for `stage` and recomputes
    /// progress and status.
    #[instrument(skip(self, update), fields(order_id = %order_id, stage = %stage))]
    pub async fn update_tracking(
        &self,
        order_id: &str,
        stage: &str,
        update: TrackingUpdate,
    ) -> Result<ProductionOrder, ServiceError> {
        let mut order = self
            .repository
            .find(order_id)
            .await?
            .ok_or_else(|| TrackingError::OrderNotFound(order_id.to_string()))?;

        let old_status = order.current_status;
        let derived = order.apply_tracking_update(stage, update, Utc::now())?;

        if let Some(record) = order.tracking_for(stage) {
            if record.quantity_completed > order.quantity {
                warn!(
                    quantity_completed = record.quantity_completed,
                    quantity = order.quantity,
                    "Stage reports more units than the order holds; it will not count as complete"
                );
            }
        }

        if !self.repository.save(&order).await? {
            return Err(TrackingError::OrderNotFound(order_id.to_string()).into());
        }

        info!(
            progress = derived.progress,
            status = %derived.status,
            "Tracking updated"
        );
        self.event_sender
            .send_or_log(Event::TrackingUpdated {
                order_id: order.order_id.clone(),
                stage: stage.to_string(),
            })
            .await;
        self.announce_status_change(&order, old_status).await;

        Ok(order)
    }

    async fn announce_status_change(&self, order: &ProductionOrder, old_status: OrderStatus) {
        if order.current_status != old_status {
            self.event_sender
                .send_or_log(Event::OrderStatusChanged {
                    order_id: order.order_id.clone(),
                    old_status,
                    new_status: order.current_status,
                })
                .await;
        }
    }
}
