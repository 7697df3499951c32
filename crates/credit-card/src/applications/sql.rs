//! SQLite-backed application store.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

use super::domain::{CreditCardApplication, Status};
use super::repository::{ApplicationRepository, RepositoryError};
use crate::config::DatabaseConfig;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS credit_card_application (
        credit_card_application_id INTEGER PRIMARY KEY AUTOINCREMENT,
        credit_card_applicant_name TEXT NOT NULL,
        credit_card_applicant_surname TEXT NOT NULL,
        credit_card_applicant_id TEXT NOT NULL UNIQUE,
        credit_card_application_status TEXT NOT NULL
    )
"#;

const SELECT_COLUMNS: &str = "SELECT credit_card_application_id, credit_card_applicant_name, \
     credit_card_applicant_surname, credit_card_applicant_id, credit_card_application_status \
     FROM credit_card_application";

/// Failure while opening or preparing the store.
#[derive(Debug, thiserror::Error)]
#[error("failed to prepare application store: {0}")]
pub struct StoreSetupError(#[from] sqlx::Error);

/// `ApplicationRepository` over a sqlx SQLite pool.
#[derive(Debug, Clone)]
pub struct SqlApplicationRepository {
    pool: SqlitePool,
}

impl SqlApplicationRepository {
    /// Open a pool from configuration, creating the database file if needed,
    /// and make sure the table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreSetupError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;
        Self::new(pool).await
    }

    /// Private in-memory database. The pool is pinned to one long-lived
    /// connection because every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreSetupError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::new(pool).await
    }

    pub async fn new(pool: SqlitePool) -> Result<Self, StoreSetupError> {
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn migrate(pool: &SqlitePool) -> Result<(), StoreSetupError> {
        sqlx::query(CREATE_TABLE).execute(pool).await?;
        info!("credit_card_application table ready");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ApplicationRepository for SqlApplicationRepository {
    async fn list(&self) -> Result<Vec<CreditCardApplication>, RepositoryError> {
        let query = format!("{SELECT_COLUMNS} ORDER BY credit_card_application_id");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(application_from_row).collect()
    }

    async fn fetch_by_applicant_id(
        &self,
        applicant_id: &str,
    ) -> Result<Option<CreditCardApplication>, RepositoryError> {
        let query = format!("{SELECT_COLUMNS} WHERE credit_card_applicant_id = ?");
        let row = sqlx::query(&query)
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(application_from_row).transpose()
    }

    async fn insert(
        &self,
        application: &CreditCardApplication,
    ) -> Result<Option<CreditCardApplication>, RepositoryError> {
        let row = sqlx::query(
            r#"
            INSERT INTO credit_card_application (
                credit_card_applicant_name,
                credit_card_applicant_surname,
                credit_card_applicant_id,
                credit_card_application_status
            )
            VALUES (?, ?, ?, ?)
            RETURNING credit_card_application_id
            "#,
        )
        .bind(&application.applicant_name)
        .bind(&application.applicant_surname)
        .bind(&application.applicant_id)
        .bind(application.status.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: Option<i64> = row
            .try_get("credit_card_application_id")
            .map_err(map_sqlx_error)?;

        Ok(id.map(|id| application.clone().with_id(id)))
    }

    async fn update_by_applicant_id(
        &self,
        application: &CreditCardApplication,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE credit_card_application
            SET credit_card_applicant_name = ?,
                credit_card_applicant_surname = ?,
                credit_card_application_status = ?
            WHERE credit_card_applicant_id = ?
            "#,
        )
        .bind(&application.applicant_name)
        .bind(&application.applicant_surname)
        .bind(application.status.value())
        .bind(&application.applicant_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_by_applicant_id(&self, applicant_id: &str) -> Result<u64, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM credit_card_application WHERE credit_card_applicant_id = ?")
                .bind(applicant_id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

fn application_from_row(row: &SqliteRow) -> Result<CreditCardApplication, RepositoryError> {
    let status: String = row
        .try_get("credit_card_application_status")
        .map_err(map_sqlx_error)?;

    Ok(CreditCardApplication {
        id: row
            .try_get("credit_card_application_id")
            .map_err(map_sqlx_error)?,
        applicant_name: row
            .try_get("credit_card_applicant_name")
            .map_err(map_sqlx_error)?,
        applicant_surname: row
            .try_get("credit_card_applicant_surname")
            .map_err(map_sqlx_error)?,
        applicant_id: row
            .try_get("credit_card_applicant_id")
            .map_err(map_sqlx_error)?,
        status: Status::from_value(&status)?,
    })
}

fn map_sqlx_error(error: sqlx::Error) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) => {
            debug!(code = ?db.code(), message = db.message(), "sqlite operation failed");
            if db.is_unique_violation() {
                return RepositoryError::Conflict;
            }
        }
        other => debug!(error = %other, "sqlite operation failed"),
    }

    RepositoryError::Unavailable(error.to_string())
}
