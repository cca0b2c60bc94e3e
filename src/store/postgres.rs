/**
 * PostgreSQL Credential Store
 *
 * Production `CredentialStore` backend over a sqlx PostgreSQL pool.
 *
 * # Schema
 *
 * - `users`     - identity records; a unique index on `lower(email)` makes
 *                 `create` atomic with respect to email uniqueness
 * - `addresses` - one row per user, keyed by `user_id` (primary key is the
 *                 foreign key), written with an upsert
 *
 * See the `migrations/` directory for the schema definition.
 */

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::store::{
    hash_password, validate_password, Address, CredentialStore, NewUser, StoreError, User,
};

/// PostgreSQL-backed credential store
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Create a store over an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn user_from_row(row: &PgRow, address: Option<Address>) -> Result<User, sqlx::Error> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            display_name: row.try_get("display_name")?,
            password_hash: row.try_get("password_hash")?,
            address,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn address_from_row(row: &PgRow) -> Result<Option<Address>, sqlx::Error> {
        // The LEFT JOIN leaves every address column NULL when the user has
        // no address; line1 is non-null in the schema, so it decides.
        let line1: Option<String> = row.try_get("line1")?;
        match line1 {
            Some(line1) => Ok(Some(Address {
                line1,
                line2: row.try_get("line2")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                zip_code: row.try_get("zip_code")?,
                country: row.try_get("country")?,
            })),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, display_name, password_hash, created_at, updated_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::user_from_row(&row, None))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn find_by_email_with_address(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.email, u.display_name, u.password_hash,
                   u.created_at, u.updated_at,
                   a.line1, a.line2, a.city, a.state, a.zip_code, a.country
            FROM users u
            LEFT JOIN addresses a ON a.user_id = u.id
            WHERE lower(u.email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let address = Self::address_from_row(&row)?;
            Self::user_from_row(&row, address)
        })
        .transpose()
        .map_err(StoreError::from)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let policy_errors = validate_password(&new_user.password);
        if !policy_errors.is_empty() {
            return Err(StoreError::Validation(policy_errors));
        }

        let password_hash = hash_password(&new_user.password)?;
        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, display_name, password_hash, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&new_user.email)
        .bind(&new_user.display_name)
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // The unique index on lower(email) is the authoritative
            // uniqueness guarantee; any caller-side existence pre-check can
            // still race a concurrent registration.
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                StoreError::DuplicateEmail
            } else {
                StoreError::Database(e)
            }
        })?;

        Self::user_from_row(&row, None).map_err(StoreError::from)
    }

    async fn update_address(&self, user_id: Uuid, address: Address) -> Result<Address, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO addresses (user_id, line1, line2, city, state, zip_code, country, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE
            SET line1 = EXCLUDED.line1,
                line2 = EXCLUDED.line2,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                zip_code = EXCLUDED.zip_code,
                country = EXCLUDED.country,
                updated_at = EXCLUDED.updated_at
            RETURNING line1, line2, city, state, zip_code, country
            "#,
        )
        .bind(user_id)
        .bind(&address.line1)
        .bind(&address.line2)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .bind(&address.country)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(Address {
            line1: row.try_get("line1").map_err(StoreError::Database)?,
            line2: row.try_get("line2").map_err(StoreError::Database)?,
            city: row.try_get("city").map_err(StoreError::Database)?,
            state: row.try_get("state").map_err(StoreError::Database)?,
            zip_code: row.try_get("zip_code").map_err(StoreError::Database)?,
            country: row.try_get("country").map_err(StoreError::Database)?,
        })
    }
}
