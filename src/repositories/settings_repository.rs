use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde_json::Value;
use std::sync::Arc;

use crate::entities::setting::{ActiveModel, Column, Entity as SettingEntity, SETTINGS_ROW_ID};
use crate::errors::ServiceError;
use crate::models::settings::Settings;

use super::{BaseRepository, Repository, SettingsRepository};

/// Single-row settings store backed by sea-orm
#[derive(Debug, Clone)]
pub struct SeaOrmSettingsRepository {
    base: BaseRepository,
}

impl SeaOrmSettingsRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl SettingsRepository for SeaOrmSettingsRepository {
    async fn load(&self) -> Result<Option<Settings>, ServiceError> {
        let row = SettingEntity::find_by_id(SETTINGS_ROW_ID)
            .one(self.base.get_db())
            .await?;

        match row.map(|model| model.document) {
            None => Ok(None),
            Some(Value::Object(document)) => Ok(Some(Settings::new(document))),
            Some(other) => Err(ServiceError::SerializationError(format!(
                "settings document is not an object: {}",
                other
            ))),
        }
    }

    async fn store(&self, settings: &Settings) -> Result<(), ServiceError> {
        let active = ActiveModel {
            id: Set(SETTINGS_ROW_ID),
            document: Set(Value::Object(settings.0.clone())),
            updated_at: Set(Utc::now()),
        };

        SettingEntity::insert(active)
            .on_conflict(
                OnConflict::column(Column::Id)
                    .update_columns([Column::Document, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.base.get_db())
            .await?;
        Ok(())
    }
}
