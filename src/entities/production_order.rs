use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::production::{OrderStatus, ProductionOrder, TrackingRecord};

/// Order row. The tracking collection is embedded as a JSON array.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: String,
    pub customer_name: String,
    pub product_description: String,
    pub quantity: i32,
    pub order_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub project_id: Option<String>,
    pub pic_name: String,
    pub priority: String,
    pub requires_accessories: bool,
    pub requires_welding: bool,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub risk_level: String,
    pub risk_score: i32,
    pub tracking: Json,
    pub progress: i32,
    pub current_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Rebuilds the domain order. Derived fields are recomputed from the
    /// stored tracking rather than trusted.
    pub fn into_order(self) -> Result<ProductionOrder, DbErr> {
        let tracking: Vec<TrackingRecord> = serde_json::from_value(self.tracking).map_err(|e| {
            DbErr::Custom(format!(
                "order {} has malformed tracking data: {}",
                self.order_id, e
            ))
        })?;
        let quantity = from_column_int(&self.order_id, "quantity", self.quantity)?;
        let risk_score = from_column_int(&self.order_id, "risk_score", self.risk_score)?;

        let mut order = ProductionOrder {
            order_id: self.order_id,
            customer_name: self.customer_name,
            product_description: self.product_description,
            quantity,
            order_date: self.order_date,
            target_date: self.target_date,
            project_id: self.project_id,
            pic_name: self.pic_name,
            priority: self.priority.parse().unwrap_or_default(),
            requires_accessories: self.requires_accessories,
            requires_welding: self.requires_welding,
            notes: self.notes,
            risk_level: self.risk_level,
            risk_score,
            tracking,
            progress: 0,
            current_status: self.current_status.parse().unwrap_or(OrderStatus::Pending),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        order.refresh_derived();
        Ok(order)
    }
}

impl TryFrom<&ProductionOrder> for ActiveModel {
    type Error = DbErr;

    fn try_from(order: &ProductionOrder) -> Result<Self, Self::Error> {
        let tracking = serde_json::to_value(&order.tracking)
            .map_err(|e| DbErr::Custom(format!("failed to encode tracking: {}", e)))?;

        Ok(ActiveModel {
            order_id: Set(order.order_id.clone()),
            customer_name: Set(order.customer_name.clone()),
            product_description: Set(order.product_description.clone()),
            quantity: Set(to_column_int(&order.order_id, "quantity", order.quantity)?),
            order_date: Set(order.order_date),
            target_date: Set(order.target_date),
            project_id: Set(order.project_id.clone()),
            pic_name: Set(order.pic_name.clone()),
            priority: Set(order.priority.to_string()),
            requires_accessories: Set(order.requires_accessories),
            requires_welding: Set(order.requires_welding),
            notes: Set(order.notes.clone()),
            risk_level: Set(order.risk_level.clone()),
            risk_score: Set(to_column_int(&order.order_id, "risk_score", order.risk_score)?),
            tracking: Set(tracking),
            progress: Set(i32::from(order.progress)),
            current_status: Set(order.current_status.to_string()),
            created_at: Set(order.created_at),
            updated_at: Set(order.updated_at),
        })
    }
}

fn to_column_int(order_id: &str, field: &str, value: u32) -> Result<i32, DbErr> {
    i32::try_from(value).map_err(|_| {
        DbErr::Custom(format!(
            "order {} {} {} exceeds the column range",
            order_id, field, value
        ))
    })
}

fn from_column_int(order_id: &str, field: &str, value: i32) -> Result<u32, DbErr> {
    u32::try_from(value)
        .map_err(|_| DbErr::Custom(format!("order {} has negative {}: {}", order_id, field, value)))
}
