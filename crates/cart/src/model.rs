use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{CartError, Result};

/// Cart line of one product for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub qty: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCart {
    pub product_id: Uuid,
    pub qty: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQty {
    pub qty: i64,
}

pub(crate) fn validate_qty(qty: i64) -> Result<()> {
    if qty < 1 {
        return Err(CartError::Validation("qty must be at least 1".to_string()));
    }
    Ok(())
}

#[derive(Debug, FromRow)]
pub(crate) struct CartRow {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub qty: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl CartRow {
    pub fn into_entity(self) -> Result<Cart> {
        Ok(Cart {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            product_id: parse_uuid(&self.product_id)?,
            qty: self.qty,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| CartError::Database(sqlx::Error::Decode(Box::new(e))))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CartError::Database(sqlx::Error::Decode(Box::new(e))))
}
