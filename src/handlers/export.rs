use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::{errors::ServiceError, services::ExportTarget, AppState};

/// Download a CSV export
#[utoipa::path(
    get,
    path = "/api/v1/export/{target}",
    params(("target" = String, Path, description = "orders, projects or complete")),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 400, description = "Invalid export target", body = crate::errors::ErrorResponse),
    ),
    tag = "export"
)]
pub async fn export_data(
    State(state): State<AppState>,
    Path(target): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let target = ExportTarget::parse(&target)?;
    let file = state.services.export.export(target).await?;

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.body,
    ))
}
