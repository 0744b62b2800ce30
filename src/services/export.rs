use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use strum::{Display, EnumString};
use tracing::{info, instrument};

use crate::{
    errors::ServiceError,
    production::ProductionOrder,
    repositories::OrderFilter,
};

use super::{OrderService, ProjectService, SettingsService};

const DELIMITER: char = ',';
const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// What to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ExportTarget {
    Orders,
    Projects,
    /// Orders, projects and settings, one titled section each.
    Complete,
}

impl ExportTarget {
    pub fn parse(target: &str) -> Result<Self, ServiceError> {
        target
            .parse()
            .map_err(|_| ServiceError::BadRequest("Invalid export target".to_string()))
    }
}

/// A rendered export ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

#[derive(Clone)]
pub struct ExportService {
    orders: OrderService,
    projects: ProjectService,
    settings: SettingsService,
}

impl ExportService {
    pub fn new(orders: OrderService, projects: ProjectService, settings: SettingsService) -> Self {
        Self {
            orders,
            projects,
            settings,
        }
    }

    #[instrument(skip(self), fields(target = %target))]
    pub async fn export(&self, target: ExportTarget) -> Result<ExportFile, ServiceError> {
        let body = match target {
            ExportTarget::Orders => self.orders_csv().await?,
            ExportTarget::Projects => self.projects_csv().await?,
            ExportTarget::Complete => {
                let sections = [
                    ("Orders", self.orders_csv().await?),
                    ("Projects", self.projects_csv().await?),
                    ("Settings", self.settings_csv().await?),
                ];
                sections
                    .iter()
                    .map(|(title, csv)| format!("{}\n{}", title, csv))
                    .collect::<Vec<_>>()
                    .join("\n\n")
            }
        };

        info!(bytes = body.len(), "Export rendered");
        Ok(ExportFile {
            filename: format!("{}-export.csv", target),
            content_type: CSV_CONTENT_TYPE,
            body,
        })
    }

    async fn orders_csv(&self) -> Result<String, ServiceError> {
        let orders = self.orders.list_orders(OrderFilter::default()).await?;
        let rows = orders
            .iter()
            .map(order_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(build_delimited_payload(&rows, DELIMITER))
    }

    async fn projects_csv(&self) -> Result<String, ServiceError> {
        let projects = self.projects.list_projects().await?;
        let rows = to_rows(&projects)?;
        Ok(build_delimited_payload(&rows, DELIMITER))
    }

    async fn settings_csv(&self) -> Result<String, ServiceError> {
        let settings = self.settings.get_settings().await?;
        if settings.is_empty() {
            return Ok(String::new());
        }
        let rows = vec![Value::Object(settings.into_inner())];
        Ok(build_delimited_payload(&rows, DELIMITER))
    }
}

fn to_rows<T: Serialize>(items: &[T]) -> Result<Vec<Value>, ServiceError> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(ServiceError::from))
        .collect()
}

/// Flattens an order for tabular output: the tracking collection becomes a
/// `<stage>_status` and `<stage>_completed` column pair per stage.
fn order_row(order: &ProductionOrder) -> Result<Value, ServiceError> {
    let mut row = match serde_json::to_value(order)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    row.remove("tracking");

    for record in &order.tracking {
        row.insert(
            format!("{}_status", record.stage),
            Value::String(record.status.clone()),
        );
        row.insert(
            format!("{}_completed", record.stage),
            Value::from(record.quantity_completed),
        );
    }

    Ok(Value::Object(row))
}

/// Renders rows as delimited text. The header is the sorted union of every
/// row's keys; missing cells are left empty.
fn build_delimited_payload(rows: &[Value], delimiter: char) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut headers = BTreeSet::new();
    for row in rows {
        if let Value::Object(map) = row {
            headers.extend(map.keys().cloned());
        }
    }

    let headers: Vec<String> = headers.into_iter().collect();
    let separator = delimiter.to_string();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|header| escape_field(header, delimiter))
            .collect::<Vec<_>>()
            .join(&separator),
    );

    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| {
                let field = row.get(header).unwrap_or(&Value::Null);
                escape_field(&value_to_string(field), delimiter)
            })
            .collect();
        lines.push(cells.join(&separator));
    }

    lines.join("\n")
}

fn escape_field(value: &str, delimiter: char) -> String {
    if value.contains(delimiter)
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r')
    {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => arr
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
