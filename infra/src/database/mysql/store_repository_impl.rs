//! MySQL implementation of the StoreRepository trait.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use sh_core::domain::entities::store::{Store, StoreType};
use sh_core::errors::{DomainError, StoreError};
use sh_core::repositories::StoreRepository;

use super::{column, contains_pattern, db_error, is_unique_violation};

const STORE_COLUMNS: &str = r#"
    id, user_id, name, store_type, category, logo_url, address, phone,
    description, latitude, longitude, whatsapp_phone, facebook_url,
    instagram_url, website_url, created_at, updated_at
"#;

/// MySQL implementation of StoreRepository
pub struct MySqlStoreRepository {
    pool: MySqlPool,
}

impl MySqlStoreRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_store(row: &MySqlRow) -> Result<Store, DomainError> {
        let store_type: String = column(row, "store_type")?;

        Ok(Store {
            id: column(row, "id")?,
            user_id: column(row, "user_id")?,
            name: column(row, "name")?,
            store_type: StoreType::parse(&store_type),
            category: column(row, "category")?,
            logo_url: column(row, "logo_url")?,
            address: column(row, "address")?,
            phone: column(row, "phone")?,
            description: column(row, "description")?,
            latitude: column(row, "latitude")?,
            longitude: column(row, "longitude")?,
            whatsapp_phone: column(row, "whatsapp_phone")?,
            facebook_url: column(row, "facebook_url")?,
            instagram_url: column(row, "instagram_url")?,
            website_url: column(row, "website_url")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }

    async fn fetch_stores(
        &self,
        filter: &str,
        binds: &[String],
        context: &'static str,
    ) -> Result<Vec<Store>, DomainError> {
        let query = format!("SELECT {} FROM stores {} ORDER BY id", STORE_COLUMNS, filter);

        let mut q = sqlx::query(&query);
        for value in binds {
            q = q.bind(value);
        }
        let rows = q.fetch_all(&self.pool).await.map_err(db_error(context))?;

        rows.iter().map(Self::row_to_store).collect()
    }
}

#[async_trait]
impl StoreRepository for MySqlStoreRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Store>, DomainError> {
        let query = format!("SELECT {} FROM stores WHERE id = ? LIMIT 1", STORE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find store"))?;

        row.as_ref().map(Self::row_to_store).transpose()
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Store>, DomainError> {
        let query = format!("SELECT {} FROM stores WHERE user_id = ? LIMIT 1", STORE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find store by owner"))?;

        row.as_ref().map(Self::row_to_store).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Store>, DomainError> {
        self.fetch_stores("", &[], "Failed to list stores").await
    }

    async fn search_text(&self, query: &str) -> Result<Vec<Store>, DomainError> {
        let pattern = contains_pattern(query);
        self.fetch_stores(
            r#"WHERE LOWER(name) LIKE ? ESCAPE '!'
                  OR LOWER(category) LIKE ? ESCAPE '!'
                  OR LOWER(COALESCE(description, '')) LIKE ? ESCAPE '!'"#,
            &[pattern.clone(), pattern.clone(), pattern],
            "Failed to search stores",
        )
        .await
    }

    async fn find_with_coordinates(&self) -> Result<Vec<Store>, DomainError> {
        self.fetch_stores(
            "WHERE latitude IS NOT NULL AND longitude IS NOT NULL",
            &[],
            "Failed to list stores with coordinates",
        )
        .await
    }

    /// Inserts the store and links it to its owner in one transaction
    async fn create_for_owner(&self, mut store: Store) -> Result<Store, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM stores WHERE user_id = ? FOR UPDATE")
                .bind(store.user_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to check existing store"))?;
        if existing.is_some() {
            return Err(StoreError::AlreadyHasStore.into());
        }

        let query = r#"
            INSERT INTO stores (
                user_id, name, store_type, category, logo_url, address, phone,
                description, latitude, longitude, whatsapp_phone, facebook_url,
                instagram_url, website_url, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(store.user_id)
            .bind(&store.name)
            .bind(store.store_type.as_str())
            .bind(&store.category)
            .bind(&store.logo_url)
            .bind(&store.address)
            .bind(&store.phone)
            .bind(&store.description)
            .bind(store.latitude)
            .bind(store.longitude)
            .bind(&store.whatsapp_phone)
            .bind(&store.facebook_url)
            .bind(&store.instagram_url)
            .bind(&store.website_url)
            .bind(store.created_at)
            .bind(store.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::from(StoreError::AlreadyHasStore)
                } else {
                    db_error("Failed to create store")(e)
                }
            })?;
        store.id = result.last_insert_id() as i64;

        sqlx::query("UPDATE users SET store_id = ? WHERE id = ?")
            .bind(store.id)
            .bind(store.user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to link store owner"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit store creation"))?;

        tracing::debug!(store_id = store.id, user_id = store.user_id, "Store row created");
        Ok(store)
    }

    async fn update(&self, store: &Store) -> Result<(), DomainError> {
        let query = r#"
            UPDATE stores SET
                name = ?,
                store_type = ?,
                category = ?,
                logo_url = ?,
                address = ?,
                phone = ?,
                description = ?,
                latitude = ?,
                longitude = ?,
                whatsapp_phone = ?,
                facebook_url = ?,
                instagram_url = ?,
                website_url = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&store.name)
            .bind(store.store_type.as_str())
            .bind(&store.category)
            .bind(&store.logo_url)
            .bind(&store.address)
            .bind(&store.phone)
            .bind(&store.description)
            .bind(store.latitude)
            .bind(store.longitude)
            .bind(&store.whatsapp_phone)
            .bind(&store.facebook_url)
            .bind(&store.instagram_url)
            .bind(&store.website_url)
            .bind(store.updated_at)
            .bind(store.id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update store"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound.into());
        }
        Ok(())
    }

    /// Deletes the store (products cascade) and unlinks the owner in one transaction
    async fn delete_for_owner(&self, store_id: i64, owner_id: i64) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        sqlx::query("UPDATE users SET store_id = NULL WHERE id = ? AND store_id = ?")
            .bind(owner_id)
            .bind(store_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to unlink store owner"))?;

        let result = sqlx::query("DELETE FROM stores WHERE id = ? AND user_id = ?")
            .bind(store_id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete store"))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(db_error("Failed to roll back store deletion"))?;
            return Ok(false);
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit store deletion"))?;
        Ok(true)
    }
}
