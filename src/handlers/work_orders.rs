use super::common::ListParams;
use crate::dto::work_orders::CompositeWorkOrderRequest;
use crate::errors::ServiceError;
use crate::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use validator::Validate;

async fn create_work_order(
    State(state): State<AppState>,
    Json(payload): Json<CompositeWorkOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let created = state.work_orders.create_composite(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_work_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let full = state.work_orders.get_full(id).await?;
    Ok(Json(full))
}

async fn list_work_orders(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    params.validate()?;
    let work_orders = match &params.search {
        Some(term) => {
            state
                .work_orders
                .search(term, params.skip, params.limit)
                .await?
        }
        None => {
            state
                .work_orders
                .list(params.skip, params.limit, params.order_by.as_deref())
                .await?
        }
    };
    Ok(Json(work_orders))
}

async fn replace_work_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CompositeWorkOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let updated = state.work_orders.replace_composite(id, &payload).await?;
    Ok(Json(updated))
}

async fn delete_work_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.work_orders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_work_order))
        .route("/", get(list_work_orders))
        .route("/:id", get(get_work_order))
        .route("/:id", put(replace_work_order))
        .route("/:id", delete(delete_work_order))
}
