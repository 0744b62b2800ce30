//! Storage seams. Every backend stores whole documents and writes them back
//! wholesale: concurrent writers to the same order race, last write wins.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::StorageBackend;
use crate::errors::ServiceError;
use crate::models::{project::Project, settings::Settings};
use crate::production::{OrderStatus, ProductionOrder};

pub mod memory;
pub mod order_repository;
pub mod project_repository;
pub mod settings_repository;

pub use memory::{InMemoryOrderRepository, InMemoryProjectRepository, InMemorySettingsRepository};
pub use order_repository::SeaOrmOrderRepository;
pub use project_repository::SeaOrmProjectRepository;
pub use settings_repository::SeaOrmSettingsRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Optional filters for listing orders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub project_id: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &ProductionOrder) -> bool {
        self.status.map_or(true, |s| order.current_status == s)
            && self
                .project_id
                .as_deref()
                .map_or(true, |p| order.project_id.as_deref() == Some(p))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Orders matching `filter`, oldest first.
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<ProductionOrder>, ServiceError>;

    async fn find(&self, order_id: &str) -> Result<Option<ProductionOrder>, ServiceError>;

    async fn insert(&self, order: &ProductionOrder) -> Result<(), ServiceError>;

    /// Overwrites a stored order. Returns `false` if it no longer exists.
    async fn save(&self, order: &ProductionOrder) -> Result<bool, ServiceError>;

    /// Returns `false` if nothing was deleted.
    async fn delete(&self, order_id: &str) -> Result<bool, ServiceError>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects, oldest first.
    async fn list(&self) -> Result<Vec<Project>, ServiceError>;

    async fn find(&self, project_id: &str) -> Result<Option<Project>, ServiceError>;

    async fn insert(&self, project: &Project) -> Result<(), ServiceError>;

    async fn save(&self, project: &Project) -> Result<bool, ServiceError>;

    async fn delete(&self, project_id: &str) -> Result<bool, ServiceError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load(&self) -> Result<Option<Settings>, ServiceError>;

    /// Inserts or replaces the settings document.
    async fn store(&self, settings: &Settings) -> Result<(), ServiceError>;
}

/// The repositories for one storage backend, plus the pool when there is one.
#[derive(Clone)]
pub struct Storage {
    pub backend: StorageBackend,
    pub db: Option<Arc<DatabaseConnection>>,
    pub orders: Arc<dyn OrderRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    pub fn database(db: Arc<DatabaseConnection>) -> Self {
        Self {
            backend: StorageBackend::Database,
            orders: Arc::new(SeaOrmOrderRepository::new(db.clone())),
            projects: Arc::new(SeaOrmProjectRepository::new(db.clone())),
            settings: Arc::new(SeaOrmSettingsRepository::new(db.clone())),
            db: Some(db),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            db: None,
            orders: Arc::new(InMemoryOrderRepository::default()),
            projects: Arc::new(InMemoryProjectRepository::default()),
            settings: Arc::new(InMemorySettingsRepository::default()),
        }
    }

    /// Checks the backing store is reachable.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        match &self.db {
            Some(db) => crate::db::check_connection(db)
                .await
                .map_err(|_| ServiceError::ServiceUnavailable("storage unreachable".to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::production::NewOrder;
    use chrono::Utc;

    #[tokio::test]
    async fn closed_pool_reports_unavailable() {
        let pool = crate::db::establish_connection("sqlite::memory:")
            .await
            .unwrap();
        let storage = Storage::database(Arc::new(pool.clone()));
        assert!(storage.ping().await.is_ok());

        crate::db::close_pool(pool).await.unwrap();
        let err = storage.ping().await.unwrap_err();
        assert!(matches!(err, ServiceError::ServiceUnavailable(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn filter_matches_status_and_project() {
        let mut input = NewOrder::with_quantity(3);
        input.project_id = Some("PRJ-1".into());
        let order = ProductionOrder::new("ORD-1", input, Utc::now());

        assert!(OrderFilter::default().matches(&order));
        assert!(OrderFilter {
            status: Some(OrderStatus::Pending),
            project_id: Some("PRJ-1".into()),
        }
        .matches(&order));
        assert!(!OrderFilter {
            status: Some(OrderStatus::Completed),
            project_id: None,
        }
        .matches(&order));
        assert!(!OrderFilter {
            status: None,
            project_id: Some("PRJ-2".into()),
        }
        .matches(&order));
    }
}
