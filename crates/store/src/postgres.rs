//! Postgres-backed user/role stores (enabled with the `postgres` feature).
//!
//! Semantics mirror the in-memory stores: `deleted_at IS NULL` everywhere a
//! read happens, soft delete instead of `DELETE`. See `schema.sql` for the
//! expected tables.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use granite_core::{Role, User};

use crate::error::{StoreError, StoreResult};
use crate::roles::RolePatch;
use crate::users::{NewUser, UserPatch};

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        role_id: row.try_get("role_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

fn role_from_row(row: &PgRow) -> Result<Role, sqlx::Error> {
    Ok(Role {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, role_id, name, email, password_hash, created_at, updated_at, deleted_at \
             FROM users WHERE deleted_at IS NULL ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| user_from_row(row).map_err(StoreError::from))
            .collect()
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, role_id, name, email, password_hash, created_at, updated_at, deleted_at \
             FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| user_from_row(&row).map_err(StoreError::from))
            .transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, role_id, name, email, password_hash, created_at, updated_at, deleted_at \
             FROM users WHERE email = $1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| user_from_row(&row).map_err(StoreError::from))
            .transpose()
    }

    pub async fn email_taken(&self, email: &str, excluding: Option<i64>) -> StoreResult<bool> {
        let row = sqlx::query(
            "SELECT EXISTS( \
                SELECT 1 FROM users \
                WHERE email = $1 AND deleted_at IS NULL \
                  AND ($2::bigint IS NULL OR id <> $2) \
             ) AS taken",
        )
        .bind(email)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("taken")?)
    }

    pub async fn create(&self, new: NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO users (role_id, name, email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) \
             RETURNING id, role_id, name, email, password_hash, created_at, updated_at, deleted_at",
        )
        .bind(new.role_id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row)?)
    }

    pub async fn update(&self, id: i64, patch: UserPatch) -> StoreResult<User> {
        let current = self.get(id).await?.ok_or(StoreError::NotFound)?;

        let row = sqlx::query(
            "UPDATE users \
             SET name = $1, email = $2, password_hash = $3, role_id = $4, updated_at = $5 \
             WHERE id = $6 AND deleted_at IS NULL \
             RETURNING id, role_id, name, email, password_hash, created_at, updated_at, deleted_at",
        )
        .bind(patch.name.unwrap_or(current.name))
        .bind(patch.email.unwrap_or(current.email))
        .bind(patch.password_hash.unwrap_or(current.password_hash))
        .bind(patch.role_id.unwrap_or(current.role_id))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(user_from_row(&row)?)
    }

    pub async fn soft_delete(&self, id: i64) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> StoreResult<Vec<Role>> {
        let rows = sqlx::query(
            "SELECT id, name, created_at, updated_at, deleted_at \
             FROM roles WHERE deleted_at IS NULL ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| role_from_row(row).map_err(StoreError::from))
            .collect()
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<Role>> {
        let row = sqlx::query(
            "SELECT id, name, created_at, updated_at, deleted_at \
             FROM roles WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| role_from_row(&row).map_err(StoreError::from))
            .transpose()
    }

    pub async fn create(&self, name: String) -> StoreResult<Role> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO roles (name, created_at, updated_at) VALUES ($1, $2, $2) \
             RETURNING id, name, created_at, updated_at, deleted_at",
        )
        .bind(&name)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(role_from_row(&row)?)
    }

    pub async fn update(&self, id: i64, patch: RolePatch) -> StoreResult<Role> {
        let current = self.get(id).await?.ok_or(StoreError::NotFound)?;

        let row = sqlx::query(
            "UPDATE roles SET name = $1, updated_at = $2 \
             WHERE id = $3 AND deleted_at IS NULL \
             RETURNING id, name, created_at, updated_at, deleted_at",
        )
        .bind(patch.name.unwrap_or(current.name))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(role_from_row(&row)?)
    }

    pub async fn soft_delete(&self, id: i64) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE roles SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
