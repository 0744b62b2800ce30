use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::pipeline::{Stage, PIPELINE};

/// Status label given to freshly created tracking records.
pub const INITIAL_STAGE_STATUS: &str = "pending";

/// Execution state of one stage for one order.
///
/// The stage is kept as a plain name rather than a [`Stage`] so that
/// collections seeded by older clients still load; lookups simply miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrackingRecord {
    #[serde(rename = "process")]
    pub stage: String,
    #[serde(default = "initial_status")]
    pub status: String,
    #[serde(default)]
    pub quantity_completed: u32,
    #[serde(default)]
    pub defect_quantity: u32,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Person in charge of the stage.
    #[serde(default)]
    pub pic_name: String,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

fn initial_status() -> String {
    INITIAL_STAGE_STATUS.to_string()
}

impl TrackingRecord {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage: stage.as_str().to_string(),
            status: initial_status(),
            quantity_completed: 0,
            defect_quantity: 0,
            start_time: None,
            end_time: None,
            pic_name: String::new(),
            last_updated: None,
        }
    }

    /// The pipeline stage this record belongs to, if the name is known.
    pub fn known_stage(&self) -> Option<Stage> {
        Stage::from_name(&self.stage)
    }

    pub fn is_for(&self, stage: Stage) -> bool {
        self.stage == stage.as_str()
    }

    pub fn has_progress(&self) -> bool {
        self.quantity_completed > 0
    }

    /// Shallow merge: every field present in `update` replaces the current
    /// value, absent fields are kept.
    pub fn merge(&mut self, update: TrackingUpdate) {
        let TrackingUpdate {
            status,
            quantity_completed,
            defect_quantity,
            start_time,
            end_time,
            pic_name,
        } = update;

        if let Some(status) = status {
            self.status = status;
        }
        if let Some(quantity) = quantity_completed {
            self.quantity_completed = quantity;
        }
        if let Some(defects) = defect_quantity {
            self.defect_quantity = defects;
        }
        if let Some(start) = start_time {
            self.start_time = start;
        }
        if let Some(end) = end_time {
            self.end_time = end;
        }
        if let Some(pic) = pic_name {
            self.pic_name = pic;
        }
    }
}

/// Builds the initial tracking collection: one pending record per stage, in
/// pipeline order.
pub fn initialize_tracking() -> Vec<TrackingRecord> {
    PIPELINE.iter().copied().map(TrackingRecord::new).collect()
}

/// Partial update for a [`TrackingRecord`].
///
/// Timestamps use a nested option so a client can clear them: an absent key
/// leaves the value alone, an explicit `null` resets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TrackingUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_completed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defect_quantity: Option<u32>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub start_time: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub end_time: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic_name: Option<String>,
}

impl TrackingUpdate {
    pub fn is_empty(&self) -> bool {
        self == &TrackingUpdate::default()
    }
}

// Distinguishes `"key": null` (Some(None)) from a missing key (None via default).
pub(crate) fn present_or_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn initial_tracking_covers_every_stage_in_order() {
        let tracking = initialize_tracking();
        assert_eq!(tracking.len(), PIPELINE.len());
        for (record, stage) in tracking.iter().zip(PIPELINE.iter()) {
            assert!(record.is_for(*stage));
            assert_eq!(record.status, "pending");
            assert_eq!(record.quantity_completed, 0);
            assert_eq!(record.defect_quantity, 0);
            assert!(record.start_time.is_none());
            assert!(record.end_time.is_none());
            assert!(record.last_updated.is_none());
            assert!(record.pic_name.is_empty());
        }
    }

    #[test]
    fn record_serializes_stage_as_process() {
        let record = TrackingRecord::new(Stage::Sanding);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["process"], "sanding");
        assert_eq!(value["quantity_completed"], 0);
        assert!(value["start_time"].is_null());
    }

    #[test]
    fn sparse_records_fill_defaults() {
        let record: TrackingRecord =
            serde_json::from_value(json!({ "process": "legacy_step" })).unwrap();
        assert_eq!(record.stage, "legacy_step");
        assert_eq!(record.status, "pending");
        assert_eq!(record.known_stage(), None);
    }

    #[test]
    fn merge_replaces_only_present_fields() {
        let mut record = TrackingRecord::new(Stage::Assembly);
        record.pic_name = "Budi".into();
        record.defect_quantity = 2;

        record.merge(TrackingUpdate {
            quantity_completed: Some(4),
            status: Some("in_progress".into()),
            ..Default::default()
        });

        assert_eq!(record.quantity_completed, 4);
        assert_eq!(record.status, "in_progress");
        assert_eq!(record.pic_name, "Budi");
        assert_eq!(record.defect_quantity, 2);
        assert_eq!(record.stage, "assembly");
    }

    #[test]
    fn explicit_null_clears_timestamp() {
        let start = Utc.with_ymd_and_hms(2025, 11, 4, 8, 0, 0).unwrap();
        let mut record = TrackingRecord::new(Stage::Coating);
        record.start_time = Some(start);
        record.end_time = Some(start);

        let update: TrackingUpdate = serde_json::from_value(json!({ "end_time": null })).unwrap();
        assert_eq!(update.end_time, Some(None));
        assert_eq!(update.start_time, None);

        record.merge(update);
        assert_eq!(record.start_time, Some(start));
        assert_eq!(record.end_time, None);
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let err = serde_json::from_value::<TrackingUpdate>(json!({ "progress": 100 }));
        assert!(err.is_err());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(TrackingUpdate::default().is_empty());
        let update: TrackingUpdate =
            serde_json::from_value(json!({ "start_time": null })).unwrap();
        assert!(!update.is_empty());
    }
}
