use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::settings::{default_efficiency_targets, EfficiencyTargets, Settings, EFFICIENCY_KEY},
    production::Stage,
    repositories::SettingsRepository,
};

/// Service for the application-wide settings document
#[derive(Clone)]
pub struct SettingsService {
    repository: Arc<dyn SettingsRepository>,
    event_sender: Arc<EventSender>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SettingsRepository>, event_sender: Arc<EventSender>) -> Self {
        Self {
            repository,
            event_sender,
        }
    }

    /// The stored document, or an empty one.
    #[instrument(skip(self))]
    pub async fn get_settings(&self) -> Result<Settings, ServiceError> {
        Ok(self.repository.load().await?.unwrap_or_default())
    }

    /// Merges `patch` into the stored document at the top level, creating it
    /// when absent.
    #[instrument(skip(self, patch), fields(keys = patch.len()))]
    pub async fn update_settings(
        &self,
        patch: Map<String, Value>,
    ) -> Result<Settings, ServiceError> {
        let mut settings = self.get_settings().await?;
        settings.merge(patch);
        self.repository.store(&settings).await?;

        info!("Settings updated");
        self.event_sender.send_or_log(Event::SettingsUpdated).await;
        Ok(settings)
    }

    /// Stored efficiency targets, falling back to the built-in defaults.
    #[instrument(skip(self))]
    pub async fn efficiency_targets(&self) -> Result<EfficiencyTargets, ServiceError> {
        let settings = self.get_settings().await?;
        Ok(settings
            .efficiency()
            .unwrap_or_else(default_efficiency_targets))
    }

    /// Replaces the stored efficiency targets. Keys must be pipeline stage names.
    #[instrument(skip(self, targets), fields(stages = targets.len()))]
    pub async fn save_efficiency_targets(
        &self,
        targets: EfficiencyTargets,
    ) -> Result<EfficiencyTargets, ServiceError> {
        if let Some(unknown) = targets.keys().find(|name| Stage::from_name(name).is_none()) {
            return Err(ServiceError::BadRequest(format!(
                "Unknown process: {}",
                unknown
            )));
        }

        let mut patch = Map::new();
        patch.insert(EFFICIENCY_KEY.to_string(), serde_json::to_value(&targets)?);
        self.update_settings(patch).await?;
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events;
    use crate::repositories::InMemorySettingsRepository;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn service() -> SettingsService {
        let (sender, _rx) = events::channel(16);
        SettingsService::new(
            Arc::new(InMemorySettingsRepository::default()),
            Arc::new(sender),
        )
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn settings_default_to_empty_and_merge_top_level() {
        let service = service();
        assert!(service.get_settings().await.unwrap().is_empty());

        service
            .update_settings(object(json!({ "company": "PT Kayu", "shift": { "start": "07:00" } })))
            .await
            .unwrap();
        let merged = service
            .update_settings(object(json!({ "shift": { "end": "16:00" } })))
            .await
            .unwrap();

        assert_eq!(merged.get("company"), Some(&json!("PT Kayu")));
        assert_eq!(merged.get("shift"), Some(&json!({ "end": "16:00" })));
    }

    #[tokio::test]
    async fn efficiency_falls_back_to_defaults_then_persists() {
        let service = service();
        let defaults = service.efficiency_targets().await.unwrap();
        assert_eq!(defaults.len(), 10);

        let mut custom = defaults.clone();
        if let Some(target) = custom.get_mut("sanding") {
            target.target_time = 3;
        }
        service.save_efficiency_targets(custom.clone()).await.unwrap();

        assert_eq!(service.efficiency_targets().await.unwrap(), custom);
    }

    #[tokio::test]
    async fn efficiency_rejects_unknown_stage() {
        let service = service();
        let mut targets = default_efficiency_targets();
        let sample = targets["sanding"].clone();
        targets.insert("painting".into(), sample);

        assert_matches!(
            service.save_efficiency_targets(targets).await,
            Err(ServiceError::BadRequest(msg)) if msg == "Unknown process: painting"
        );
    }
}
