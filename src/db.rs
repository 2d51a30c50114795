use crate::config::AppConfig;
use crate::entities::{supporting_document, user, work_order, work_order_item, work_order_vendor};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// Establishes a connection pool to the database.
pub async fn establish_connection(database_url: &str) -> Result<DbPool, DbErr> {
    let config = DbConfig {
        url: database_url.to_string(),
        ..Default::default()
    };
    establish_connection_with_config(&config).await
}

/// Establishes a connection pool with custom pool settings.
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, DbErr> {
    debug!("Configuring database connection with: {:?}", config);

    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    info!(
        "Connecting to database with max_connections={}",
        config.max_connections
    );
    Database::connect(opt).await
}

/// Builds the pool from the application configuration.
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> anyhow::Result<DbPool> {
    let url = cfg.database.connection_url()?;
    let db_config = DbConfig {
        url,
        max_connections: cfg.database.pool_max_connections,
        min_connections: cfg.database.pool_min_connections,
        connect_timeout: Duration::from_secs(cfg.database.connect_timeout_secs),
        idle_timeout: Duration::from_secs(cfg.database.idle_timeout_secs),
    };
    Ok(establish_connection_with_config(&db_config).await?)
}

/// Creates any missing tables from the entity definitions at startup,
/// standing in for a migration framework.
pub async fn create_schema(db: &DbPool) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = vec![
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(work_order::Entity),
        schema.create_table_from_entity(work_order_item::Entity),
        schema.create_table_from_entity(work_order_vendor::Entity),
        schema.create_table_from_entity(supporting_document::Entity),
    ];

    for stmt in &mut statements {
        stmt.if_not_exists();
        db.execute(backend.build(&*stmt)).await?;
    }

    info!("Database tables created/verified");
    Ok(())
}

/// Connectivity probe used by the health endpoint.
pub async fn ping(db: &DbPool) -> bool {
    db.ping().await.is_ok()
}
