use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::models::project::Project;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: String,
    pub project_name: String,
    pub client: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Project {
    fn from(model: Model) -> Self {
        Project {
            project_id: model.project_id,
            project_name: model.project_name,
            client: model.client,
            description: model.description,
            status: model.status,
            start_date: model.start_date,
            target_date: model.target_date,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Project> for ActiveModel {
    fn from(project: &Project) -> Self {
        ActiveModel {
            project_id: Set(project.project_id.clone()),
            project_name: Set(project.project_name.clone()),
            client: Set(project.client.clone()),
            description: Set(project.description.clone()),
            status: Set(project.status.clone()),
            start_date: Set(project.start_date),
            target_date: Set(project.target_date),
            notes: Set(project.notes.clone()),
            created_at: Set(project.created_at),
            updated_at: Set(project.updated_at),
        }
    }
}
