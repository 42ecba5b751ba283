use chrono::Utc;
use orderin_core::Database;
use tracing::info;
use uuid::Uuid;

use crate::model::{validate_qty, AddCart, Cart, CartRow};
use crate::{CartError, Result};

/// Cart CRUD over the `carts` table
#[derive(Clone)]
pub struct CartService {
    db: Database,
}

impl CartService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Add a product to the user's cart.
    /// Adding a product that is already in the cart increases its quantity.
    pub async fn add(&self, user_id: Uuid, request: &AddCart) -> Result<Cart> {
        validate_qty(request.qty)?;

        let now = Utc::now().to_rfc3339();
        let row = sqlx::query_as::<_, CartRow>(
            "INSERT INTO carts (id, user_id, product_id, qty, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_id, product_id)
             DO UPDATE SET qty = carts.qty + excluded.qty, updated_at = excluded.updated_at
             RETURNING *",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(request.product_id.to_string())
        .bind(request.qty)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.db)
        .await?;

        let cart = row.into_entity()?;
        info!(user_id = %user_id, cart_id = %cart.id, qty = cart.qty, "cart updated");
        Ok(cart)
    }

    /// All cart lines of a user, newest first
    pub async fn get_all(&self, user_id: Uuid) -> Result<Vec<Cart>> {
        let rows = sqlx::query_as::<_, CartRow>(
            "SELECT * FROM carts WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(CartRow::into_entity).collect()
    }

    pub async fn update_qty(&self, user_id: Uuid, cart_id: Uuid, qty: i64) -> Result<()> {
        validate_qty(qty)?;

        let result = sqlx::query(
            "UPDATE carts SET qty = ?, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(qty)
        .bind(Utc::now().to_rfc3339())
        .bind(cart_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CartError::NotFound(cart_id.to_string()));
        }
        Ok(())
    }

    pub async fn delete(&self, user_id: Uuid, cart_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM carts WHERE id = ? AND user_id = ?")
            .bind(cart_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CartError::NotFound(cart_id.to_string()));
        }
        Ok(())
    }
}
