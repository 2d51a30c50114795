use crate::errors::ServiceError;
use serde::Deserialize;

/// Query parameters shared by the list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub order_by: Option<String>,
    pub search: Option<String>,
}

fn default_limit() -> u64 {
    100
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
            order_by: None,
            search: None,
        }
    }
}

impl ListParams {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.limit < 1 || self.limit > 1000 {
            return Err(ServiceError::ValidationError(
                "limit must be between 1 and 1000".into(),
            ));
        }
        Ok(())
    }
}
