use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application user keyed by a caller-chosen identifier rather than a
/// surrogate key. The credential is stored as supplied.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub name: Option<String>,
    pub password: Option<String>,
    pub user_group: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
