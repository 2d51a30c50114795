use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Work-order header row. Line items, vendor candidates, and supporting
/// documents hang off this record and are replaced wholesale on full update.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub document_number: String,

    pub request_date: NaiveDate,
    pub request_type: String,
    pub submitted_by: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub scope_of_works: Option<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_urgent: bool,
    pub budget_status: Option<String>,
    pub cost_type: Option<String>,
    pub budget_index: Option<String>,
    pub budget_name: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub cost_estimation: Option<Decimal>,

    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub remaining_budget: Option<Decimal>,

    pub under_over: Option<String>,
    pub charge_to_tenant: bool,
    pub recommended_contractor: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,

    pub vendor_selection_method: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub test_and_analysis: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::work_order_item::Entity")]
    WorkOrderItem,
    #[sea_orm(has_many = "super::work_order_vendor::Entity")]
    WorkOrderVendor,
    #[sea_orm(has_many = "super::supporting_document::Entity")]
    SupportingDocument,
}

impl Related<super::work_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkOrderItem.def()
    }
}

impl Related<super::work_order_vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkOrderVendor.def()
    }
}

impl Related<super::supporting_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupportingDocument.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
