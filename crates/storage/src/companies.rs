use sqlx::SqlitePool;
use thiserror::Error;

use jobboard_core::{Company, CompanyId, CompanyOption};

/// Read-only access to the `companies` reference table.
#[derive(Clone)]
pub struct CompanyRepository {
    pub(crate) pool: SqlitePool,
}

impl CompanyRepository {
    /// Lists company names ordered by id.
    pub async fn list_names(&self) -> Result<Vec<String>, CompanyError> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM companies ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    /// Lists `(id, name)` pairs ordered by id.
    pub async fn list_options(&self) -> Result<Vec<CompanyOption>, CompanyError> {
        let rows = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM companies ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| CompanyOption { id, name })
            .collect())
    }

    pub async fn fetch(&self, id: CompanyId) -> Result<Option<Company>, CompanyError> {
        let row =
            sqlx::query_as::<_, CompanyRow>("SELECT id, name, address FROM companies WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: i64,
    name: String,
    address: String,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
        }
    }
}

/// Errors that can occur while reading companies.
#[derive(Debug, Error)]
pub enum CompanyError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
