//! Work-order service: transactional composite writes, the nested read
//! projection, and the flat list/search/delete operations.

use crate::db::DbPool;
use crate::dto::work_orders::{
    CompositeWorkOrderRequest, CompositeWriteResponse, ExtractedComposite, ExtractedHeader,
    WorkOrderFullResponse,
};
use crate::entities::{supporting_document, work_order, work_order_item, work_order_vendor};
use crate::errors::ServiceError;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Service for managing work orders and their child rows.
#[derive(Clone)]
pub struct WorkOrderService {
    db: Arc<DbPool>,
}

impl WorkOrderService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Persists a composite payload: header first to obtain its id, then
    /// items, vendors, and documents, all in one transaction.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_composite(
        &self,
        request: &CompositeWorkOrderRequest,
    ) -> Result<CompositeWriteResponse, ServiceError> {
        let extracted = request.extract()?;
        require_document_number(&extracted.header)?;
        self.ensure_document_number_free(&extracted.header.document_number, None)
            .await?;

        let items_written = extracted.items.len() as u64;
        let created = self
            .db
            .transaction::<_, work_order::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let mut header = header_active_model(&extracted.header);
                    header.created_at = Set(now);
                    header.updated_at = Set(Some(now));
                    let created = header.insert(txn).await?;
                    insert_children(txn, created.id, &extracted).await?;
                    Ok(created)
                })
            })
            .await
            .map_err(unwrap_txn_err)?;

        info!(
            work_order_id = created.id,
            document_number = %created.document_number,
            items = items_written,
            "work order created"
        );
        Ok(CompositeWriteResponse {
            work_order: created,
            items_created: items_written,
            total_cost: request.total_cost,
        })
    }

    /// Full replace: overwrites the header's scalar columns from a freshly
    /// extracted payload and recreates all child rows, in one transaction.
    #[instrument(skip(self, request))]
    pub async fn replace_composite(
        &self,
        id: i32,
        request: &CompositeWorkOrderRequest,
    ) -> Result<CompositeWriteResponse, ServiceError> {
        let extracted = request.extract()?;
        require_document_number(&extracted.header)?;
        let existing = work_order::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("work order {id} not found")))?;
        self.ensure_document_number_free(&extracted.header.document_number, Some(id))
            .await?;

        let items_written = extracted.items.len() as u64;
        let updated = self
            .db
            .transaction::<_, work_order::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let mut header = header_active_model(&extracted.header);
                    header.id = Set(id);
                    header.created_at = Set(existing.created_at);
                    header.updated_at = Set(Some(Utc::now()));
                    let updated = header.update(txn).await?;
                    delete_children(txn, id).await?;
                    insert_children(txn, id, &extracted).await?;
                    Ok(updated)
                })
            })
            .await
            .map_err(unwrap_txn_err)?;

        info!(work_order_id = id, items = items_written, "work order replaced");
        Ok(CompositeWriteResponse {
            work_order: updated,
            items_created: items_written,
            total_cost: request.total_cost,
        })
    }

    /// Nested projection mirroring the composite request, with the total
    /// recomputed from the item rows.
    #[instrument(skip(self))]
    pub async fn get_full(&self, id: i32) -> Result<WorkOrderFullResponse, ServiceError> {
        let header = work_order::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("work order {id} not found")))?;

        let items = work_order_item::Entity::find()
            .filter(work_order_item::Column::WorkOrderId.eq(id))
            .order_by_asc(work_order_item::Column::ItemOrder)
            .all(&*self.db)
            .await?;
        let vendors = work_order_vendor::Entity::find()
            .filter(work_order_vendor::Column::WorkOrderId.eq(id))
            .all(&*self.db)
            .await?;
        let documents = supporting_document::Entity::find()
            .filter(supporting_document::Column::WorkOrderId.eq(id))
            .all(&*self.db)
            .await?;

        let total_cost: Decimal = items
            .iter()
            .map(|item| item.quantity * item.unit_price)
            .sum();

        Ok(WorkOrderFullResponse {
            id,
            work_order: header,
            work_items: items.into_iter().map(Into::into).collect(),
            tender_vendor_data: vendors.into_iter().map(Into::into).collect(),
            attachments: documents.into_iter().map(Into::into).collect(),
            authorizations: Vec::new(),
            total_cost,
        })
    }

    /// Paginated flat listing, ordered by an allow-listed column (unknown
    /// names fall back to the primary key).
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        skip: u64,
        limit: u64,
        order_by: Option<&str>,
    ) -> Result<Vec<work_order::Model>, ServiceError> {
        let column = order_by.map(order_column).unwrap_or(work_order::Column::Id);
        Ok(work_order::Entity::find()
            .order_by_asc(column)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?)
    }

    /// Substring search OR-combined across the text columns,
    /// case-insensitive regardless of backend collation.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        term: &str,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<work_order::Model>, ServiceError> {
        let pattern = format!("%{}%", term.to_lowercase());
        let condition = [
            work_order::Column::DocumentNumber,
            work_order::Column::ScopeOfWorks,
            work_order::Column::BudgetIndex,
            work_order::Column::BudgetName,
            work_order::Column::UnderOver,
            work_order::Column::RecommendedContractor,
            work_order::Column::Reason,
            work_order::Column::TestAndAnalysis,
        ]
        .into_iter()
        .fold(Condition::any(), |cond, column| {
            cond.add(contains_ci(column, &pattern))
        });

        Ok(work_order::Entity::find()
            .filter(condition)
            .order_by_asc(work_order::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?)
    }

    /// Hard delete; child rows go with the header in the same transaction.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        work_order::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("work order {id} not found")))?;

        self.db
            .transaction::<_, (), ServiceError>(move |txn| {
                Box::pin(async move {
                    delete_children(txn, id).await?;
                    work_order::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(())
                })
            })
            .await
            .map_err(unwrap_txn_err)?;

        info!(work_order_id = id, "work order deleted");
        Ok(())
    }

    async fn ensure_document_number_free(
        &self,
        document_number: &str,
        exclude_id: Option<i32>,
    ) -> Result<(), ServiceError> {
        let mut query = work_order::Entity::find()
            .filter(work_order::Column::DocumentNumber.eq(document_number));
        if let Some(id) = exclude_id {
            query = query.filter(work_order::Column::Id.ne(id));
        }
        if query.one(&*self.db).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "work order with document number '{document_number}' already exists"
            )));
        }
        Ok(())
    }
}

/// `LOWER(column) LIKE pattern`; `pattern` must already be lower-cased.
fn contains_ci(column: work_order::Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(pattern)
}

/// Both composite write paths refuse to persist a header without its
/// human-facing identifier.
fn require_document_number(header: &ExtractedHeader) -> Result<(), ServiceError> {
    if header.document_number.is_empty() {
        return Err(ServiceError::ValidationError(
            "document number (worNo) must not be empty".into(),
        ));
    }
    Ok(())
}

fn unwrap_txn_err(err: TransactionError<ServiceError>) -> ServiceError {
    match err {
        TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}

fn header_active_model(header: &ExtractedHeader) -> work_order::ActiveModel {
    work_order::ActiveModel {
        document_number: Set(header.document_number.clone()),
        request_date: Set(header.request_date),
        request_type: Set(header.request_type.clone()),
        submitted_by: Set(header.submitted_by.as_str().to_string()),
        scope_of_works: Set(Some(header.scope_of_works.clone())),
        start_date: Set(header.start_date),
        end_date: Set(header.end_date),
        is_urgent: Set(header.is_urgent),
        budget_status: Set(Some(header.budget_status.clone())),
        cost_type: Set(Some(header.cost_type.clone())),
        budget_index: Set(Some(header.budget_index.clone())),
        budget_name: Set(Some(header.budget_name.clone())),
        cost_estimation: Set(Some(header.cost_estimation)),
        remaining_budget: Set(Some(header.remaining_budget)),
        under_over: Set(Some(header.under_over.clone())),
        charge_to_tenant: Set(header.charge_to_tenant),
        recommended_contractor: Set(Some(header.recommended_contractor.clone())),
        reason: Set(Some(header.reason.clone())),
        vendor_selection_method: Set(Some(header.vendor_selection_method.as_str().to_string())),
        test_and_analysis: Set(Some(header.test_and_analysis.clone())),
        ..Default::default()
    }
}

async fn insert_children(
    txn: &DatabaseTransaction,
    work_order_id: i32,
    extracted: &ExtractedComposite,
) -> Result<(), ServiceError> {
    if !extracted.items.is_empty() {
        let rows = extracted
            .items
            .iter()
            .map(|item| work_order_item::ActiveModel {
                work_order_id: Set(work_order_id),
                description: Set(item.description.clone()),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                total_price: Set(item.total_price),
                item_order: Set(item.item_order),
                ..Default::default()
            });
        work_order_item::Entity::insert_many(rows).exec(txn).await?;
    }

    if !extracted.vendor_names.is_empty() {
        let rows = extracted
            .vendor_names
            .iter()
            .map(|name| work_order_vendor::ActiveModel {
                work_order_id: Set(work_order_id),
                vendor_name: Set(name.clone()),
                ..Default::default()
            });
        work_order_vendor::Entity::insert_many(rows)
            .exec(txn)
            .await?;
    }

    if !extracted.documents.is_empty() {
        let rows = extracted
            .documents
            .iter()
            .map(|doc| supporting_document::ActiveModel {
                work_order_id: Set(work_order_id),
                document_type: Set(doc.document_type.clone()),
                has_document: Set(doc.has_document),
                ..Default::default()
            });
        supporting_document::Entity::insert_many(rows)
            .exec(txn)
            .await?;
    }

    Ok(())
}

async fn delete_children(txn: &DatabaseTransaction, work_order_id: i32) -> Result<(), ServiceError> {
    work_order_item::Entity::delete_many()
        .filter(work_order_item::Column::WorkOrderId.eq(work_order_id))
        .exec(txn)
        .await?;
    work_order_vendor::Entity::delete_many()
        .filter(work_order_vendor::Column::WorkOrderId.eq(work_order_id))
        .exec(txn)
        .await?;
    supporting_document::Entity::delete_many()
        .filter(supporting_document::Column::WorkOrderId.eq(work_order_id))
        .exec(txn)
        .await?;
    Ok(())
}

/// Allow-listed ordering columns for the flat listing; anything else orders
/// by the primary key.
fn order_column(name: &str) -> work_order::Column {
    use work_order::Column;
    match name {
        "id" => Column::Id,
        "document_number" => Column::DocumentNumber,
        "request_date" => Column::RequestDate,
        "request_type" => Column::RequestType,
        "submitted_by" => Column::SubmittedBy,
        "scope_of_works" => Column::ScopeOfWorks,
        "start_date" => Column::StartDate,
        "end_date" => Column::EndDate,
        "is_urgent" => Column::IsUrgent,
        "budget_status" => Column::BudgetStatus,
        "cost_type" => Column::CostType,
        "budget_index" => Column::BudgetIndex,
        "budget_name" => Column::BudgetName,
        "cost_estimation" => Column::CostEstimation,
        "remaining_budget" => Column::RemainingBudget,
        "under_over" => Column::UnderOver,
        "charge_to_tenant" => Column::ChargeToTenant,
        "recommended_contractor" => Column::RecommendedContractor,
        "reason" => Column::Reason,
        "vendor_selection_method" => Column::VendorSelectionMethod,
        "test_and_analysis" => Column::TestAndAnalysis,
        "created_at" => Column::CreatedAt,
        "updated_at" => Column::UpdatedAt,
        _ => Column::Id,
    }
}
