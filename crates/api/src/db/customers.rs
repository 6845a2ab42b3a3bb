//! `PostgreSQL` customer store.
//!
//! Queries are checked at runtime (`query_as`) so the crate builds without a
//! live database. `ORDER BY` clauses are assembled only from [`SortField`]
//! column names, never from request text.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use customer_hub_core::{Customer, CustomerId, Page, PageRequest, Sort, SortField};

use super::{CustomerRecord, CustomerStore, RepositoryError};

const RETURNING_COLUMNS: &str = "id, created_at, updated_at, first_name, last_name, dob, username";

/// Row shape of the public customer columns (password excluded).
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    first_name: String,
    last_name: String,
    dob: NaiveDate,
    username: String,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Self {
            id: r.id,
            created_at: r.created_at,
            updated_at: r.updated_at,
            first_name: r.first_name,
            last_name: r.last_name,
            dob: r.dob,
            username: r.username,
        }
    }
}

/// Customer store backed by the `customers` table.
#[derive(Debug, Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    /// Create a new customer store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a unique-index violation to `Conflict`, everything else to `Database`.
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("username already exists".to_owned());
    }
    RepositoryError::Database(e)
}

/// Build the `ORDER BY` clause, always ending with `id` as a tiebreaker.
fn order_by_clause(sort: &[Sort]) -> String {
    let mut terms: Vec<String> = sort
        .iter()
        .map(|s| format!("{} {}", s.field.as_str(), s.direction.as_sql()))
        .collect();
    if !sort.iter().any(|s| s.field == SortField::Id) {
        terms.push("id ASC".to_owned());
    }
    terms.join(", ")
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn insert(&self, record: &CustomerRecord) -> Result<Customer, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO customers (first_name, last_name, dob, username, password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RETURNING_COLUMNS}
            "
        );
        let row: CustomerRow = sqlx::query_as(&sql)
            .bind(&record.first_name)
            .bind(&record.last_name)
            .bind(record.dob)
            .bind(&record.username)
            .bind(&record.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let sql = format!("SELECT {RETURNING_COLUMNS} FROM customers WHERE id = $1");
        let row: Option<CustomerRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Customer::from))
    }

    async fn list(
        &self,
        sort: &[Sort],
        page: PageRequest,
    ) -> Result<Page<Customer>, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {RETURNING_COLUMNS} FROM customers ORDER BY {} LIMIT $1 OFFSET $2",
            order_by_clause(sort)
        );
        let limit = i64::from(page.per_page);
        let offset = i64::try_from(page.offset())
            .map_err(|_| RepositoryError::DataCorruption("page offset overflow".to_owned()))?;

        let rows: Vec<CustomerRow> = sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total = u64::try_from(total)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative count: {total}")))?;

        Ok(Page {
            items: rows.into_iter().map(Customer::from).collect(),
            total,
            request: page,
        })
    }

    async fn update(
        &self,
        id: CustomerId,
        record: &CustomerRecord,
    ) -> Result<Option<Customer>, RepositoryError> {
        let sql = format!(
            r"
            UPDATE customers
            SET first_name = $1, last_name = $2, dob = $3, username = $4,
                password = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {RETURNING_COLUMNS}
            "
        );
        let row: Option<CustomerRow> = sqlx::query_as(&sql)
            .bind(&record.first_name)
            .bind(&record.last_name)
            .bind(record.dob)
            .bind(&record.username)
            .bind(&record.password_hash)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(row.map(Customer::from))
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn username_taken(
        &self,
        username: &str,
        except: Option<CustomerId>,
    ) -> Result<bool, RepositoryError> {
        let taken: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM customers
                WHERE username = $1 AND ($2::INT IS NULL OR id <> $2)
            )
            ",
        )
        .bind(username)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
