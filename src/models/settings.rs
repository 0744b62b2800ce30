use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::production::{Stage, StageTarget, PIPELINE};

/// Settings key holding the per-stage efficiency targets.
pub const EFFICIENCY_KEY: &str = "efficiency";

/// The single application settings document.
///
/// Free-form JSON object; updates merge at the top level only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct Settings(pub Map<String, Value>);

impl Settings {
    pub fn new(document: Map<String, Value>) -> Self {
        Self(document)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Replaces every top-level key present in `patch`. Nested objects are
    /// replaced wholesale, not merged.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            self.0.insert(key, value);
        }
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Stored efficiency targets, when present and well-formed.
    pub fn efficiency(&self) -> Option<EfficiencyTargets> {
        self.get(EFFICIENCY_KEY)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }
}

/// Efficiency targets keyed by stage name.
pub type EfficiencyTargets = BTreeMap<String, StageTarget>;

/// Built-in targets for every pipeline stage.
pub fn default_efficiency_targets() -> EfficiencyTargets {
    PIPELINE
        .iter()
        .map(|stage: &Stage| (stage.as_str().to_string(), stage.default_target()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn merge_is_top_level_only() {
        let mut settings = Settings::new(object(json!({
            "company": "PT Kayu",
            "shift": { "start": "07:00", "end": "16:00" }
        })));

        settings.merge(object(json!({ "shift": { "start": "08:00" }, "logo": "x.png" })));

        assert_eq!(settings.get("company"), Some(&json!("PT Kayu")));
        assert_eq!(settings.get("shift"), Some(&json!({ "start": "08:00" })));
        assert_eq!(settings.get("logo"), Some(&json!("x.png")));
    }

    #[test]
    fn default_targets_cover_pipeline() {
        let targets = default_efficiency_targets();
        assert_eq!(targets.len(), PIPELINE.len());
        assert_eq!(targets["warehouse_in"].name, "Gudang Masuk");
        assert_eq!(targets["welding"].target_output, 88);

        let value = serde_json::to_value(&targets).unwrap();
        assert_eq!(value["sanding"]["targetTime"], 4);
    }

    #[test]
    fn stored_efficiency_is_read_back() {
        let mut settings = Settings::default();
        assert!(settings.efficiency().is_none());

        settings.merge(object(json!({
            "efficiency": {
                "sanding": { "name": "Amplas", "targetTime": 3, "targetQuality": 96, "targetOutput": 91 }
            }
        })));

        let targets = settings.efficiency().unwrap();
        assert_eq!(targets["sanding"].target_time, 3);
    }

    #[test]
    fn settings_serialize_as_plain_object() {
        let settings = Settings::new(object(json!({ "theme": "dark" })));
        assert_eq!(serde_json::to_value(&settings).unwrap(), json!({ "theme": "dark" }));
    }
}
