use super::common::ListParams;
use crate::dto::users::{AuthenticateRequest, AuthenticateResponse, UserCreate, UserResponse, UserUpdate};
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

async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let created = state.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.users.get(&user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ServiceError> {
    params.validate()?;
    let users = match &params.search {
        Some(term) => state.users.search(term, params.skip, params.limit).await?,
        None => {
            state
                .users
                .list(params.skip, params.limit, params.order_by.as_deref())
                .await?
        }
    };
    let users: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    Ok(Json(users))
}

async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let updated = state.users.update(&user_id, payload).await?;
    Ok(Json(UserResponse::from(updated)))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    state.users.delete(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn authenticate(
    State(state): State<AppState>,
    Json(payload): Json<AuthenticateRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state
        .users
        .authenticate(&payload.user_id, &payload.password)
        .await?;
    Ok(Json(AuthenticateResponse {
        message: "Authentication successful".into(),
        user_id: user.user_id,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/", get(list_users))
        .route("/authenticate", post(authenticate))
        .route("/:user_id", get(get_user))
        .route("/:user_id", put(update_user))
        .route("/:user_id", delete(delete_user))
}
