//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

use paycode_types::{
    Inquiry, InquiryId, InquiryRepository, Payment, PaymentCode, PaymentCodeId,
    PaymentCodeRepository, PaymentCodeStatus, PaymentId, PaymentRepository, RepoError,
};

use crate::types::{
    format_timestamp, map_inquiry_insert_error, parse_amount, parse_status, parse_timestamp,
    parse_uuid,
};

// ─────────────────────────────────────────────────────────────────────────────
// Row structs (ids and timestamps stored as TEXT)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct DbPaymentCode {
    id: String,
    payment_code: String,
    name: String,
    status: String,
    expiration_date: String,
    created_at: String,
    updated_at: String,
}

impl DbPaymentCode {
    fn into_domain(self) -> Result<PaymentCode, RepoError> {
        Ok(PaymentCode::from_parts(
            PaymentCodeId::from_uuid(parse_uuid(&self.id)?),
            self.payment_code,
            self.name,
            parse_status(&self.status)?,
            parse_timestamp(&self.expiration_date)?,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}

#[derive(FromRow)]
struct DbInquiry {
    id: String,
    transaction_id: String,
    payment_code: String,
    amount: String,
    created_at: String,
    updated_at: String,
}

impl DbInquiry {
    fn into_domain(self) -> Result<Inquiry, RepoError> {
        Ok(Inquiry::from_parts(
            InquiryId::from_uuid(parse_uuid(&self.id)?),
            self.transaction_id,
            self.payment_code,
            parse_amount(&self.amount)?,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}

#[derive(FromRow)]
struct DbId {
    id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure on-disk SQLite target directory exists.
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if !in_memory {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every in-memory connection is its own database; keep exactly one.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };
        let pool = pool_options.connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::raw_sql(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementations
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentCodeRepository for SqliteRepo {
    async fn create_payment_code(&self, code: &PaymentCode) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO payment_codes (id, payment_code, name, status, expiration_date, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(code.id.to_string())
        .bind(&code.payment_code)
        .bind(&code.name)
        .bind(code.status.as_str())
        .bind(format_timestamp(code.expiration_date))
        .bind(format_timestamp(code.created_at))
        .bind(format_timestamp(code.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_payment_code(&self, id: PaymentCodeId) -> Result<Option<PaymentCode>, RepoError> {
        let row: Option<DbPaymentCode> = sqlx::query_as(
            r#"SELECT id, payment_code, name, status, expiration_date, created_at, updated_at
               FROM payment_codes WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbPaymentCode::into_domain).transpose()
    }

    async fn get_ids_expiring_by(
        &self,
        instant: DateTime<Utc>,
    ) -> Result<Vec<PaymentCodeId>, RepoError> {
        let rows: Vec<DbId> = sqlx::query_as(
            r#"SELECT id FROM payment_codes
               WHERE status = ? AND expiration_date <= ?
               ORDER BY expiration_date, id"#,
        )
        .bind(PaymentCodeStatus::Active.as_str())
        .bind(format_timestamp(instant))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.iter()
            .map(|row| parse_uuid(&row.id).map(PaymentCodeId::from_uuid))
            .collect()
    }

    async fn update_payment_code_status(
        &self,
        id: PaymentCodeId,
        status: PaymentCodeStatus,
    ) -> Result<(), RepoError> {
        let result =
            sqlx::query(r#"UPDATE payment_codes SET status = ?, updated_at = ? WHERE id = ?"#)
                .bind(status.as_str())
                .bind(format_timestamp(Utc::now()))
                .bind(id.to_string())
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
impl InquiryRepository for SqliteRepo {
    async fn create_inquiry(&self, inquiry: &Inquiry) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO inquiries (id, transaction_id, payment_code, amount, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(inquiry.id.to_string())
        .bind(&inquiry.transaction_id)
        .bind(&inquiry.payment_code)
        .bind(inquiry.amount.to_string())
        .bind(format_timestamp(inquiry.created_at))
        .bind(format_timestamp(inquiry.updated_at))
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
               FROM inquiries WHERE transaction_id = ?"#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbInquiry::into_domain).transpose()
    }
}

#[async_trait]
impl PaymentRepository for SqliteRepo {
    async fn create_payment(&self, payment: &Payment) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO payments (id, transaction_id, payment_code, name, amount, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(payment.id.to_string())
        .bind(&payment.transaction_id)
        .bind(&payment.payment_code)
        .bind(&payment.name)
        .bind(&payment.amount)
        .bind(format_timestamp(payment.created_at))
        .bind(format_timestamp(payment.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}

impl SqliteRepo {
    /// Looks up a stored payment by id.
    pub async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let row: Option<(String, String, String, String, String, String, String)> =
            sqlx::query_as(
                r#"SELECT id, transaction_id, payment_code, name, amount, created_at, updated_at
                   FROM payments WHERE id = ?"#,
            )
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(|(id, tx, code, name, amount, created, updated)| {
            Ok(Payment::from_parts(
                PaymentId::from_uuid(parse_uuid(&id)?),
                tx,
                code,
                name,
                amount,
                parse_timestamp(&created)?,
                parse_timestamp(&updated)?,
            ))
        })
        .transpose()
    }
}
