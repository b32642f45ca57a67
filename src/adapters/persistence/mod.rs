use sqlx::PgPool;

use crate::app_error::AppError;

pub mod prediction;
pub mod user;

const MAX_JSON_LOG_LEN: usize = 200;

/// Parse a JSONB column into `T`, falling back to `T::default()`.
///
/// SQL NULL yields the default silently; anything else that fails to parse is
/// logged with the entity it belongs to.
pub fn parse_json_with_fallback<T: serde::de::DeserializeOwned + Default>(
    json: &serde_json::Value,
    field_name: &str,
    entity_type: &str,
    entity_id: &str,
) -> T {
    if json.is_null() {
        return T::default();
    }

    serde_json::from_value(json.clone()).unwrap_or_else(|err| {
        let raw_str = json.to_string();
        let truncated = if raw_str.len() > MAX_JSON_LOG_LEN {
            let cut = (0..=MAX_JSON_LOG_LEN)
                .rev()
                .find(|&i| raw_str.is_char_boundary(i))
                .unwrap_or(0);
            format!("{}...", &raw_str[..cut])
        } else {
            raw_str
        };

        tracing::warn!(
            field = field_name,
            entity_type = entity_type,
            entity_id = entity_id,
            raw_json = %truncated,
            error = %err,
            "Failed to parse JSON field, using default value"
        );
        T::default()
    })
}

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("A record with this value already exists".into())
            }
            // The referenced row is gone, e.g. an owner deleted mid-session.
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                tracing::debug!(error = %db_err, "Referenced record missing");
                AppError::NotFound
            }
            _ => {
                tracing::error!(error = ?err, "Database error");
                AppError::Database(err.to_string())
            }
        }
    }
}
