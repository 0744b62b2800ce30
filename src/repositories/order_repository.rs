use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::error;

use crate::entities::production_order::{ActiveModel, Column, Entity as OrderEntity};
use crate::errors::ServiceError;
use crate::production::ProductionOrder;

use super::{BaseRepository, OrderFilter, OrderRepository, Repository};

/// Repository for production orders backed by sea-orm
#[derive(Debug, Clone)]
pub struct SeaOrmOrderRepository {
    base: BaseRepository,
}

impl SeaOrmOrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<ProductionOrder>, ServiceError> {
        let mut query = OrderEntity::find();
        if let Some(status) = filter.status {
            query = query.filter(Column::CurrentStatus.eq(status.to_string()));
        }
        if let Some(project_id) = &filter.project_id {
            query = query.filter(Column::ProjectId.eq(project_id.clone()));
        }

        let rows = query
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::OrderId)
            .all(self.base.get_db())
            .await?;

        rows.into_iter()
            .map(|row| row.into_order().map_err(ServiceError::from))
            .collect()
    }

    async fn find(&self, order_id: &str) -> Result<Option<ProductionOrder>, ServiceError> {
        let row = OrderEntity::find_by_id(order_id.to_string())
            .one(self.base.get_db())
            .await?;

        row.map(|model| model.into_order())
            .transpose()
            .map_err(|e| {
                error!(order_id = %order_id, error = %e, "Failed to decode stored order");
                ServiceError::from(e)
            })
    }

    async fn insert(&self, order: &ProductionOrder) -> Result<(), ServiceError> {
        let active = ActiveModel::try_from(order)?;
        OrderEntity::insert(active)
            .exec_without_returning(self.base.get_db())
            .await?;
        Ok(())
    }

    async fn save(&self, order: &ProductionOrder) -> Result<bool, ServiceError> {
        let active = ActiveModel::try_from(order)?;
        match OrderEntity::update(active).exec(self.base.get_db()).await {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, order_id: &str) -> Result<bool, ServiceError> {
        let result = OrderEntity::delete_by_id(order_id.to_string())
            .exec(self.base.get_db())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
