pub mod common;
pub mod export;
pub mod orders;
pub mod pipeline;
pub mod projects;
pub mod settings;

use std::sync::Arc;

use crate::events::EventSender;
use crate::repositories::Storage;
use crate::services::{ExportService, OrderService, ProjectService, SettingsService};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<OrderService>,
    pub projects: Arc<ProjectService>,
    pub settings: Arc<SettingsService>,
    pub export: Arc<ExportService>,
}

impl AppServices {
    pub fn new(storage: &Storage, event_sender: Arc<EventSender>) -> Self {
        let orders = OrderService::new(storage.orders.clone(), event_sender.clone());
        let projects = ProjectService::new(storage.projects.clone(), event_sender.clone());
        let settings = SettingsService::new(storage.settings.clone(), event_sender);
        let export = ExportService::new(orders.clone(), projects.clone(), settings.clone());

        Self {
            orders: Arc::new(orders),
            projects: Arc::new(projects),
            settings: Arc::new(settings),
            export: Arc::new(export),
        }
    }
}
