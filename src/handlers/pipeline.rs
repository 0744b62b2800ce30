use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::production::{Applicability, Stage, StageTarget, PIPELINE};

/// One entry of the stage catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StageInfo {
    pub name: Stage,
    pub display_name: String,
    pub position: usize,
    pub applicability: Applicability,
    pub default_target: StageTarget,
}

impl From<Stage> for StageInfo {
    fn from(stage: Stage) -> Self {
        Self {
            name: stage,
            display_name: stage.display_name().to_string(),
            position: stage.position(),
            applicability: stage.applicability(),
            default_target: stage.default_target(),
        }
    }
}

pub fn stage_catalog() -> Vec<StageInfo> {
    PIPELINE.iter().copied().map(StageInfo::from).collect()
}

/// The production pipeline in order
#[utoipa::path(
    get,
    path = "/api/v1/pipeline",
    responses(
        (status = 200, description = "Stage catalog", body = [StageInfo]),
    ),
    tag = "pipeline"
)]
pub async fn list_stages() -> impl IntoResponse {
    Json(stage_catalog())
}
