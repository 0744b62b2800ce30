use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use std::sync::Arc;

use crate::entities::project::{ActiveModel, Column, Entity as ProjectEntity};
use crate::errors::ServiceError;
use crate::models::project::Project;

use super::{BaseRepository, ProjectRepository, Repository};

/// Repository for projects backed by sea-orm
#[derive(Debug, Clone)]
pub struct SeaOrmProjectRepository {
    base: BaseRepository,
}

impl SeaOrmProjectRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl ProjectRepository for SeaOrmProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, ServiceError> {
        let rows = ProjectEntity::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::ProjectId)
            .all(self.base.get_db())
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn find(&self, project_id: &str) -> Result<Option<Project>, ServiceError> {
        let row = ProjectEntity::find_by_id(project_id.to_string())
            .one(self.base.get_db())
            .await?;
        Ok(row.map(Project::from))
    }

    async fn insert(&self, project: &Project) -> Result<(), ServiceError> {
        ProjectEntity::insert(ActiveModel::from(project))
            .exec_without_returning(self.base.get_db())
            .await?;
        Ok(())
    }

    async fn save(&self, project: &Project) -> Result<bool, ServiceError> {
        match ProjectEntity::update(ActiveModel::from(project))
            .exec(self.base.get_db())
            .await
        {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, project_id: &str) -> Result<bool, ServiceError> {
        let result = ProjectEntity::delete_by_id(project_id.to_string())
            .exec(self.base.get_db())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
