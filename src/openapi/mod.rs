use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Production Tracker API",
        version = "1.0.0",
        description = r#"
# Production Tracker API

Tracks manufacturing orders through a fixed ten-stage pipeline.

- **Orders**: create, patch and delete production orders
- **Tracking**: report per-stage progress; overall progress and status are recomputed on every update
- **Projects**: group orders under a customer project
- **Settings**: free-form settings document and per-stage efficiency targets
- **Export**: CSV downloads of orders, projects or everything

Errors share one body shape:

```json
{
  "error": "Not Found",
  "message": "Order not found",
  "request_id": "0f8e7c1a-2b7d-4a55-9a43-3f0f7d0d6c11",
  "timestamp": "2025-11-04T10:30:00+00:00"
}
```
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    paths(
        crate::handlers::orders::list_orders,
        crate::handlers::orders::create_order,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::delete_order,
        crate::handlers::orders::update_tracking,
        crate::handlers::projects::list_projects,
        crate::handlers::projects::create_project,
        crate::handlers::projects::get_project,
        crate::handlers::projects::update_project,
        crate::handlers::projects::delete_project,
        crate::handlers::settings::get_settings,
        crate::handlers::settings::update_settings,
        crate::handlers::settings::get_efficiency,
        crate::handlers::settings::save_efficiency,
        crate::handlers::pipeline::list_stages,
        crate::handlers::export::export_data,
        crate::health::health_check,
        crate::health::service_status,
    ),
    components(
        schemas(
            crate::production::ProductionOrder,
            crate::production::NewOrder,
            crate::production::OrderPatch,
            crate::production::OrderStatus,
            crate::production::Priority,
            crate::production::TrackingRecord,
            crate::production::TrackingUpdate,
            crate::production::Stage,
            crate::production::StageTarget,
            crate::production::Applicability,
            crate::handlers::orders::TrackingRequest,
            crate::handlers::pipeline::StageInfo,
            crate::handlers::common::MessageResponse,
            crate::models::project::Project,
            crate::models::project::NewProject,
            crate::models::project::ProjectPatch,
            crate::models::settings::Settings,
            crate::health::HealthInfo,
            crate::health::HealthDetail,
            crate::health::HealthStatus,
            crate::health::ServiceStatus,
            crate::errors::ErrorResponse
        )
    ),
    tags(
        (name = "orders", description = "Production order management"),
        (name = "tracking", description = "Per-stage progress reporting"),
        (name = "projects", description = "Customer projects"),
        (name = "settings", description = "Settings and efficiency targets"),
        (name = "pipeline", description = "Stage catalog"),
        (name = "export", description = "CSV exports"),
        (name = "health", description = "Health and service metadata")
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
