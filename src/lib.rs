//! Work-order CRUD microservice.
//!
//! HTTP transport (axum) over a service layer that validates and normalizes
//! payloads, persisting them through sea-orm. The composite work-order
//! creation path fans a single request out into the header, item, vendor,
//! and supporting-document tables inside one transaction.

pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod mapping;
pub mod services;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{users::UserService, work_orders::WorkOrderService};

/// Shared application state handed to every request handler. Explicitly
/// constructed at startup; there is no process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<db::DbPool>,
    pub config: config::AppConfig,
    pub users: UserService,
    pub work_orders: WorkOrderService,
}

impl AppState {
    pub fn new(db: Arc<db::DbPool>, config: config::AppConfig) -> Self {
        Self {
            users: UserService::new(db.clone()),
            work_orders: WorkOrderService::new(db.clone()),
            db,
            config,
        }
    }
}

/// Builds the application router with all routes and middleware attached.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1/users", handlers::users::router())
        .nest("/api/v1/work_orders", handlers::work_orders::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
