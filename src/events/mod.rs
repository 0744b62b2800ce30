use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::production::OrderStatus;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is closed.
    pub async fn send_or_log(&self, event: Event) {
        let name = event.name();
        if let Err(e) = self.send(event).await {
            warn!(error = %e, event = name, "Failed to send event");
        }
    }
}

/// Creates a bounded event channel.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

/// Domain events. Nothing persists them; they exist for logs and metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    OrderCreated(String),
    OrderUpdated(String),
    OrderDeleted(String),
    TrackingUpdated {
        order_id: String,
        stage: String,
    },
    OrderStatusChanged {
        order_id: String,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },
    ProjectCreated(String),
    ProjectUpdated(String),
    ProjectDeleted(String),
    SettingsUpdated,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::OrderCreated(_) => "order_created",
            Event::OrderUpdated(_) => "order_updated",
            Event::OrderDeleted(_) => "order_deleted",
            Event::TrackingUpdated { .. } => "tracking_updated",
            Event::OrderStatusChanged { .. } => "order_status_changed",
            Event::ProjectCreated(_) => "project_created",
            Event::ProjectUpdated(_) => "project_updated",
            Event::ProjectDeleted(_) => "project_deleted",
            Event::SettingsUpdated => "settings_updated",
        }
    }
}

/// Drains the event channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        counter!("production_tracker.events", 1, "event" => event.name());

        match &event {
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => {
                info!(
                    order_id = %order_id,
                    old_status = %old_status,
                    new_status = %new_status,
                    "Order status changed"
                );
                if *new_status == OrderStatus::Completed {
                    counter!("production_tracker.orders_completed", 1);
                }
            }
            Event::TrackingUpdated { order_id, stage } => {
                info!(order_id = %order_id, stage = %stage, "Tracking updated");
            }
            other => info!(event = other.name(), "Received event: {:?}", other),
        }
    }

    info!("Event channel closed; event processing stopped");
}
