use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::production::tracking::present_or_null;

pub const DEFAULT_PROJECT_STATUS: &str = "active";

/// A customer project grouping several production orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub project_id: String,
    pub project_name: String,
    pub client: String,
    pub description: String,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(project_id: impl Into<String>, input: NewProject, now: DateTime<Utc>) -> Self {
        Self {
            project_id: project_id.into(),
            project_name: input.project_name,
            client: input.client,
            description: input.description,
            status: input.status,
            start_date: input.start_date,
            target_date: input.target_date,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_patch(&mut self, patch: ProjectPatch, now: DateTime<Utc>) {
        if let Some(value) = patch.project_name {
            self.project_name = value;
        }
        if let Some(value) = patch.client {
            self.client = value;
        }
        if let Some(value) = patch.description {
            self.description = value;
        }
        if let Some(value) = patch.status {
            self.status = value;
        }
        if let Some(value) = patch.start_date {
            self.start_date = value;
        }
        if let Some(value) = patch.target_date {
            self.target_date = value;
        }
        if let Some(value) = patch.notes {
            self.notes = value;
        }
        self.updated_at = now;
    }
}

fn default_project_status() -> String {
    DEFAULT_PROJECT_STATUS.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewProject {
    #[serde(alias = "projectName")]
    #[validate(length(min = 1, max = 200, message = "project_name is required"))]
    pub project_name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_project_status")]
    pub status: String,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, alias = "targetDate")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProjectPatch {
    #[serde(default, alias = "projectName", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        default,
        alias = "startDate",
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        alias = "targetDate",
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = Date)]
    pub target_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
