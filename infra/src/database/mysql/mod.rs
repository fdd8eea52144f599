//! MySQL implementations of the repository traits

mod activity_repository_impl;
mod product_repository_impl;
mod rating_repository_impl;
mod store_repository_impl;
mod user_repository_impl;

pub use activity_repository_impl::MySqlActivityRepository;
pub use product_repository_impl::MySqlProductRepository;
pub use rating_repository_impl::MySqlRatingRepository;
pub use store_repository_impl::MySqlStoreRepository;
pub use user_repository_impl::MySqlUserRepository;

use sh_core::errors::DomainError;

/// Map a SQLx failure to an internal domain error, logging the detail.
/// Only the context reaches the message; clients see the generic text anyway.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        tracing::error!(error = %e, context, "Database operation failed");
        DomainError::internal(format!("{}: {}", context, e))
    }
}

/// Whether a SQLx failure is a unique-key violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Escape character declared by every `LIKE ... ESCAPE` clause
const LIKE_ESCAPE: char = '!';

/// Lowercased `%text%` pattern with LIKE wildcards in `text` matched literally
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Read a column, mapping decode failures to an internal error
pub(crate) fn column<'r, T>(row: &'r sqlx::mysql::MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    sqlx::Row::try_get(row, name).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    })
}
