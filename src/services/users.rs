//! User service: uniqueness-checked create, the standard CRUD operations,
//! and credential checking.

use crate::db::DbPool;
use crate::dto::users::{UserCreate, UserUpdate};
use crate::entities::user;
use crate::errors::ServiceError;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, data), fields(user_id = %data.user_id))]
    pub async fn create(&self, data: UserCreate) -> Result<user::Model, ServiceError> {
        if user::Entity::find_by_id(data.user_id.as_str())
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "user '{}' already exists",
                data.user_id
            )));
        }

        let created = user::ActiveModel {
            user_id: Set(data.user_id),
            name: Set(data.name),
            password: Set(data.password),
            user_group: Set(data.user_group),
        }
        .insert(&*self.db)
        .await?;

        info!(user_id = %created.user_id, "user created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: &str) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user '{user_id}' not found")))
    }

    /// Paginated listing ordered by an allow-listed column; unknown names
    /// fall back to the primary key.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        skip: u64,
        limit: u64,
        order_by: Option<&str>,
    ) -> Result<Vec<user::Model>, ServiceError> {
        let column = match order_by {
            Some("name") => user::Column::Name,
            Some("user_group") => user::Column::UserGroup,
            _ => user::Column::UserId,
        };
        Ok(user::Entity::find()
            .order_by_asc(column)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?)
    }

    /// Case-insensitive substring search over identifier and display name.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        term: &str,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<user::Model>, ServiceError> {
        let pattern = format!("%{}%", term.to_lowercase());
        Ok(user::Entity::find()
            .filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::UserId))).like(pattern.as_str()))
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Name))).like(pattern.as_str())),
            )
            .order_by_asc(user::Column::UserId)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?)
    }

    /// Partial update; only fields present in the payload are touched.
    #[instrument(skip(self, data))]
    pub async fn update(&self, user_id: &str, data: UserUpdate) -> Result<user::Model, ServiceError> {
        let existing = self.get(user_id).await?;
        let mut model: user::ActiveModel = existing.into();
        if let Some(name) = data.name {
            model.name = Set(Some(name));
        }
        if let Some(password) = data.password {
            model.password = Set(Some(password));
        }
        if let Some(user_group) = data.user_group {
            model.user_group = Set(Some(user_group));
        }
        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str) -> Result<(), ServiceError> {
        let existing = self.get(user_id).await?;
        user::Entity::delete_by_id(existing.user_id)
            .exec(&*self.db)
            .await?;
        info!(user_id, "user deleted");
        Ok(())
    }

    /// Compares the supplied credential with the stored one.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let user = user::Entity::find_by_id(user_id).one(&*self.db).await?;
        match user {
            Some(user) if user.password.as_deref() == Some(password) => Ok(user),
            _ => Err(ServiceError::AuthError("Invalid credentials".into())),
        }
    }
}
