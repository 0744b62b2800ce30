use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

use super::error::TrackingError;
use super::pipeline::RequirementFlags;
use super::status::{recompute, DerivedStatus, OrderStatus};
use super::tracking::{initialize_tracking, present_or_null, TrackingRecord, TrackingUpdate};

/// Risk label assigned to orders that do not carry one.
pub const DEFAULT_RISK_LEVEL: &str = "LOW";

/// Largest quantity or risk score the order table can hold (`i32::MAX`).
pub const MAX_COLUMN_VALUE: u32 = 2_147_483_647;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// A manufacturing order together with its embedded tracking records.
///
/// `progress` and `current_status` are derived: every mutation path ends in
/// [`ProductionOrder::refresh_derived`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductionOrder {
    pub order_id: String,
    pub customer_name: String,
    pub product_description: String,
    pub quantity: u32,
    pub order_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub project_id: Option<String>,
    pub pic_name: String,
    pub priority: Priority,
    pub requires_accessories: bool,
    pub requires_welding: bool,
    pub notes: String,
    pub risk_level: String,
    pub risk_score: u32,
    pub tracking: Vec<TrackingRecord>,
    pub progress: u8,
    pub current_status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductionOrder {
    /// Builds a fresh order with one pending tracking record per stage.
    pub fn new(order_id: impl Into<String>, input: NewOrder, now: DateTime<Utc>) -> Self {
        let mut order = Self {
            order_id: order_id.into(),
            customer_name: input.customer_name,
            product_description: input.product_description,
            quantity: input.quantity,
            order_date: input.order_date,
            target_date: input.target_date,
            project_id: input.project_id,
            pic_name: input.pic_name,
            priority: input.priority,
            requires_accessories: input.requires_accessories,
            requires_welding: input.requires_welding,
            notes: input.notes,
            risk_level: input.risk_level,
            risk_score: input.risk_score,
            tracking: initialize_tracking(),
            progress: 0,
            current_status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        order.refresh_derived();
        order
    }

    pub fn requirements(&self) -> RequirementFlags {
        RequirementFlags::new(self.requires_accessories, self.requires_welding)
    }

    /// What the engine would derive from the current tracking data.
    pub fn derived(&self) -> DerivedStatus {
        recompute(self.quantity, self.requirements(), &self.tracking)
    }

    /// Overwrites `progress` and `current_status` with freshly derived values.
    pub fn refresh_derived(&mut self) -> DerivedStatus {
        let derived = self.derived();
        self.progress = derived.progress;
        self.current_status = derived.status;
        derived
    }

    pub fn tracking_for(&self, stage: &str) -> Option<&TrackingRecord> {
        self.tracking.iter().find(|record| record.stage == stage)
    }

    /// Merges `update` into the record for `stage`, stamps it, and re-derives
    /// the order status.
    pub fn apply_tracking_update(
        &mut self,
        stage: &str,
        update: TrackingUpdate,
        now: DateTime<Utc>,
    ) -> Result<DerivedStatus, TrackingError> {
        let record = self
            .tracking
            .iter_mut()
            .find(|record| record.stage == stage)
            .ok_or_else(|| TrackingError::StageNotFound {
                order_id: self.order_id.clone(),
                stage: stage.to_string(),
            })?;

        record.merge(update);
        record.last_updated = Some(now);
        self.updated_at = now;

        Ok(self.refresh_derived())
    }

    /// Shallow patch of the order's own fields. Tracking records are only
    /// changed through [`ProductionOrder::apply_tracking_update`].
    pub fn apply_patch(&mut self, patch: OrderPatch, now: DateTime<Utc>) -> DerivedStatus {
        let OrderPatch {
            customer_name,
            product_description,
            quantity,
            order_date,
            target_date,
            project_id,
            pic_name,
            priority,
            requires_accessories,
            requires_welding,
            notes,
            risk_level,
            risk_score,
        } = patch;

        if let Some(value) = customer_name {
            self.customer_name = value;
        }
        if let Some(value) = product_description {
            self.product_description = value;
        }
        if let Some(value) = quantity {
            self.quantity = value;
        }
        if let Some(value) = order_date {
            self.order_date = value;
        }
        if let Some(value) = target_date {
            self.target_date = value;
        }
        if let Some(value) = project_id {
            self.project_id = value;
        }
        if let Some(value) = pic_name {
            self.pic_name = value;
        }
        if let Some(value) = priority {
            self.priority = value;
        }
        if let Some(value) = requires_accessories {
            self.requires_accessories = value;
        }
        if let Some(value) = requires_welding {
            self.requires_welding = value;
        }
        if let Some(value) = notes {
            self.notes = value;
        }
        if let Some(value) = risk_level {
            self.risk_level = value;
        }
        if let Some(value) = risk_score {
            self.risk_score = value;
        }

        self.updated_at = now;
        self.refresh_derived()
    }
}

fn default_risk_level() -> String {
    DEFAULT_RISK_LEVEL.to_string()
}

/// Payload for creating an order. Server-owned fields (`order_id`,
/// `tracking`, `progress`, `current_status`, timestamps) are ignored if sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewOrder {
    #[serde(default, alias = "customerName")]
    #[validate(length(max = 200))]
    pub customer_name: String,
    #[serde(default, alias = "product")]
    pub product_description: String,
    #[serde(alias = "qty")]
    #[validate(range(
        min = 1,
        max = 2147483647,
        message = "quantity must be between 1 and 2147483647"
    ))]
    pub quantity: u32,
    #[serde(default, alias = "orderDate")]
    pub order_date: Option<NaiveDate>,
    #[serde(default, alias = "targetDate")]
    pub target_date: Option<NaiveDate>,
    #[serde(default, alias = "project")]
    pub project_id: Option<String>,
    #[serde(default, alias = "picName")]
    pub pic_name: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, alias = "requiresAccessories")]
    pub requires_accessories: bool,
    #[serde(default, alias = "requiresWelding")]
    pub requires_welding: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_risk_level", alias = "riskLevel")]
    pub risk_level: String,
    #[serde(default, alias = "riskScore")]
    #[validate(range(max = 2147483647))]
    pub risk_score: u32,
}

impl NewOrder {
    pub fn with_quantity(quantity: u32) -> Self {
        Self {
            customer_name: String::new(),
            product_description: String::new(),
            quantity,
            order_date: None,
            target_date: None,
            project_id: None,
            pic_name: String::new(),
            priority: Priority::default(),
            requires_accessories: false,
            requires_welding: false,
            notes: String::new(),
            risk_level: default_risk_level(),
            risk_score: 0,
        }
    }
}

/// Partial update for an order. Absent keys are left alone; `null` clears the
/// nullable date and project fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderPatch {
    #[serde(default, alias = "customerName", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub customer_name: Option<String>,
    #[serde(default, alias = "product", skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    #[serde(default, alias = "qty", skip_serializing_if = "Option::is_none")]
    #[validate(range(
        min = 1,
        max = 2147483647,
        message = "quantity must be between 1 and 2147483647"
    ))]
    pub quantity: Option<u32>,
    #[serde(
        default,
        alias = "orderDate",
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub order_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        alias = "targetDate",
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub target_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        alias = "project",
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub project_id: Option<Option<String>>,
    #[serde(default, alias = "picName", skip_serializing_if = "Option::is_none")]
    pub pic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(
        default,
        alias = "requiresAccessories",
        skip_serializing_if = "Option::is_none"
    )]
    pub requires_accessories: Option<bool>,
    #[serde(default, alias = "requiresWelding", skip_serializing_if = "Option::is_none")]
    pub requires_welding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, alias = "riskLevel", skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(default, alias = "riskScore", skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 2147483647))]
    pub risk_score: Option<u32>,
}
