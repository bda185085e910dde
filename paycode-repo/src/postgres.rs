//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use paycode_types::{
    Inquiry, InquiryId, InquiryRepository, Payment, PaymentCode, PaymentCodeId,
    PaymentCodeRepository, PaymentCodeStatus, PaymentRepository, RepoError,
};

use crate::types::{map_inquiry_insert_error, parse_amount, parse_status};

#[derive(FromRow)]
struct DbPaymentCode {
    id: Uuid,
    payment_code: String,
    name: String,
    status: String,
    expiration_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DbPaymentCode {
    fn into_domain(self) -> Result<PaymentCode, RepoError> {
        Ok(PaymentCode::from_parts(
            PaymentCodeId::from_uuid(self.id),
            self.payment_code,
            self.name,
            parse_status(&self.status)?,
            self.expiration_date,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[derive(FromRow)]
struct DbInquiry {
    id: Uuid,
    transaction_id: String,
    payment_code: String,
    amount: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DbInquiry {
    fn into_domain(self) -> Result<Inquiry, RepoError> {
        Ok(Inquiry::from_parts(
            InquiryId::from_uuid(self.id),
            self.transaction_id,
            self.payment_code,
            parse_amount(&self.amount)?,
            self.created_at,
            self.updated_at,
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_tables_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl PaymentCodeRepository for PostgresRepo {
    async fn create_payment_code(&self, code: &PaymentCode) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO payment_codes (id, payment_code, name, status, expiration_date, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(code.id.into_uuid())
        .bind(&code.payment_code)
        .bind(&code.name)
        .bind(code.status.as_str())
        .bind(code.expiration_date)
        .bind(code.created_at)
        .bind(code.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_payment_code(&self, id: PaymentCodeId) -> Result<Option<PaymentCode>, RepoError> {
        let row: Option<DbPaymentCode> = sqlx::query_as(
            r#"SELECT id, payment_code, name, status, expiration_date, created_at, updated_at
               FROM payment_codes WHERE id = $1"#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbPaymentCode::into_domain).transpose()
    }

    async fn get_ids_expiring_by(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<Vec<PaymentCodeId>, RepoError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"SELECT id FROM payment_codes
               WHERE status = $1 AND expiration_date <= $2
               ORDER BY expiration_date, id"#,
        )
        .bind(PaymentCodeStatus::Active.as_str())
        .bind(instant)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(ids.into_iter().map(PaymentCodeId::from_uuid).collect())
    }

    async fn update_payment_code_status(
        &self,
        id: PaymentCodeId,
        status: PaymentCodeStatus,
    ) -> Result<(), RepoError> {
        let result =
            sqlx::query(r#"UPDATE payment_codes SET status = $1, updated_at = $2 WHERE id = $3"#)
                .bind(status.as_str())
                .bind(Utc::now())
                .bind(id.into_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl InquiryRepository for PostgresRepo {
    async fn create_inquiry(&self, inquiry: &Inquiry) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO inquiries (id, transaction_id, payment_code, amount, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(inquiry.id.into_uuid())
        .bind(&inquiry.transaction_id)
        .bind(&inquiry.payment_code)
        .bind(inquiry.amount.to_string())
        .bind(inquiry.created_at)
        .bind(inquiry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_inquiry_insert_error(e, &inquiry.transaction_id))?;

        Ok(())
    }

    async fn get_inquiry_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Inquiry>, RepoError> {
        let row: Option<DbInquiry> = sqlx::query_as(
            r#"SELECT id, transaction_id, payment_code, amount, created_at, updated_at
               FROM inquiries WHERE transaction_id = $1"#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbInquiry::into_domain).transpose()
    }
}

#[async_trait]
impl PaymentRepository for PostgresRepo {
    async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO payments (id, transaction_id, payment_code, name, amount, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(payment.id.into_uuid())
        .bind(&payment.transaction_id)
        .bind(&payment.payment_code)
        .bind(&payment.name)
        .bind(&payment.amount)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}
