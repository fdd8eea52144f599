//! MySQL implementation of the ActivityRepository trait (favorites and views).

use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;

use sh_core::domain::entities::engagement::ProductView;
use sh_core::errors::DomainError;
use sh_core::repositories::ActivityRepository;

use super::{column, db_error};

/// MySQL implementation of ActivityRepository
pub struct MySqlActivityRepository {
    pool: MySqlPool,
}

impl MySqlActivityRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for MySqlActivityRepository {
    /// `INSERT IGNORE` against the unique (user_id, product_id) key;
    /// zero affected rows means the favorite already existed
    async fn add_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "INSERT IGNORE INTO user_favorites (user_id, product_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to add favorite"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM user_favorites WHERE user_id = ? AND product_id = ?")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to remove favorite"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_favorites WHERE user_id = ? AND product_id = ?)",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check favorite"))?;

        Ok(exists == 1)
    }

    async fn favorite_product_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError> {
        sqlx::query_scalar(
            "SELECT product_id FROM user_favorites WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list favorites"))
    }

    async fn record_view(&self, view: ProductView) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO product_views (user_id, product_id, viewed_at) VALUES (?, ?, ?)")
            .bind(view.user_id)
            .bind(view.product_id)
            .bind(view.viewed_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to record product view"))?;
        Ok(())
    }

    async fn views_by_user(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<ProductView>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, user_id, product_id, viewed_at FROM product_views \
             WHERE user_id = ? ORDER BY viewed_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list product views"))?;

        rows.iter()
            .map(|row| {
                Ok(ProductView {
                    id: column(row, "id")?,
                    user_id: column(row, "user_id")?,
                    product_id: column(row, "product_id")?,
                    viewed_at: column(row, "viewed_at")?,
                })
            })
            .collect()
    }
}
