//! Process-local backends used for demos and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::models::{project::Project, settings::Settings};
use crate::production::ProductionOrder;

use super::{OrderFilter, OrderRepository, ProjectRepository, SettingsRepository};

#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: DashMap<String, ProductionOrder>,
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<ProductionOrder>, ServiceError> {
        let mut orders: Vec<ProductionOrder> = self
            .orders
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        orders.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        Ok(orders)
    }

    async fn find(&self, order_id: &str) -> Result<Option<ProductionOrder>, ServiceError> {
        Ok(self.orders.get(order_id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, order: &ProductionOrder) -> Result<(), ServiceError> {
        self.orders.insert(order.order_id.clone(), order.clone());
        Ok(())
    }

    async fn save(&self, order: &ProductionOrder) -> Result<bool, ServiceError> {
        match self.orders.get_mut(&order.order_id) {
            Some(mut entry) => {
                *entry = order.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, order_id: &str) -> Result<bool, ServiceError> {
        Ok(self.orders.remove(order_id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    projects: DashMap<String, Project>,
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, ServiceError> {
        let mut projects: Vec<Project> = self
            .projects
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        projects.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.project_id.cmp(&b.project_id))
        });
        Ok(projects)
    }

    async fn find(&self, project_id: &str) -> Result<Option<Project>, ServiceError> {
        Ok(self.projects.get(project_id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, project: &Project) -> Result<(), ServiceError> {
        self.projects
            .insert(project.project_id.clone(), project.clone());
        Ok(())
    }

    async fn save(&self, project: &Project) -> Result<bool, ServiceError> {
        match self.projects.get_mut(&project.project_id) {
            Some(mut entry) => {
                *entry = project.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, project_id: &str) -> Result<bool, ServiceError> {
        Ok(self.projects.remove(project_id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct InMemorySettingsRepository {
    settings: RwLock<Option<Settings>>,
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> Result<Option<Settings>, ServiceError> {
        Ok(self.settings.read().await.clone())
    }

    async fn store(&self, settings: &Settings) -> Result<(), ServiceError> {
        *self.settings.write().await = Some(settings.clone());
        Ok(())
    }
}
