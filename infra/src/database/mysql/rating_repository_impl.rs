//! MySQL implementation of the RatingRepository trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use sh_core::domain::entities::engagement::{ProductRating, RatingWithAuthor};
use sh_core::errors::DomainError;
use sh_core::repositories::RatingRepository;

use super::{column, db_error};

/// MySQL implementation of RatingRepository
pub struct MySqlRatingRepository {
    pool: MySqlPool,
}

impl MySqlRatingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_rating(row: &MySqlRow) -> Result<ProductRating, DomainError> {
        Ok(ProductRating {
            id: column(row, "id")?,
            product_id: column(row, "product_id")?,
            user_id: column(row, "user_id")?,
            rating: column(row, "rating")?,
            comment: column(row, "comment")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl RatingRepository for MySqlRatingRepository {
    /// Relies on the unique (user_id, product_id) key
    async fn upsert(&self, rating: ProductRating) -> Result<ProductRating, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO product_ratings (product_id, user_id, rating, comment, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                rating = VALUES(rating),
                comment = VALUES(comment),
                updated_at = ?
            "#,
        )
        .bind(rating.product_id)
        .bind(rating.user_id)
        .bind(rating.rating)
        .bind(&rating.comment)
        .bind(rating.created_at)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to save rating"))?;

        let row = sqlx::query(
            "SELECT id, product_id, user_id, rating, comment, created_at, updated_at \
             FROM product_ratings WHERE user_id = ? AND product_id = ?",
        )
        .bind(rating.user_id)
        .bind(rating.product_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to reload rating"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit rating"))?;

        Self::row_to_rating(&row)
    }

    async fn find_by_user_and_product(
        &self,
        user_id: i64,
        product_id: i64,
    ) -> Result<Option<ProductRating>, DomainError> {
        let row = sqlx::query(
            "SELECT id, product_id, user_id, rating, comment, created_at, updated_at \
             FROM product_ratings WHERE user_id = ? AND product_id = ? LIMIT 1",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find rating"))?;

        row.as_ref().map(Self::row_to_rating).transpose()
    }

    async fn find_by_product(&self, product_id: i64) -> Result<Vec<RatingWithAuthor>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.product_id, r.user_id, r.rating, r.comment,
                   r.created_at, r.updated_at, u.name AS user_name
            FROM product_ratings r
            JOIN users u ON u.id = r.user_id
            WHERE r.product_id = ?
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list ratings"))?;

        rows.iter()
            .map(|row| {
                Ok(RatingWithAuthor {
                    rating: Self::row_to_rating(row)?,
                    user_name: column(row, "user_name")?,
                })
            })
            .collect()
    }
}
