//! Actor Repository
//!
//! Data access over the two actor tables. Customers and mechanics share one
//! identity namespace, so uniqueness checks span both tables.

use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use crate::domain::{Actor, ActorRole, NewActor, ProfileUpdate};
use crate::error::{PlatformError, Result};
use crate::repository::duplicate_identity;

pub struct ActorRepository {
    pool: MySqlPool,
}

impl ActorRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS customers (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                username VARCHAR(100) NOT NULL,
                mobile VARCHAR(50) NOT NULL,
                email VARCHAR(255) NOT NULL,
                password_hash VARCHAR(255) NOT NULL,
                created_at BIGINT NOT NULL,
                UNIQUE KEY uq_customers_username (username),
                UNIQUE KEY uq_customers_email (email)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS mechanics (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                username VARCHAR(100) NOT NULL,
                mobile VARCHAR(50) NOT NULL,
                email VARCHAR(255) NOT NULL,
                password_hash VARCHAR(255) NOT NULL,
                latitude DOUBLE NOT NULL,
                longitude DOUBLE NOT NULL,
                is_available BOOLEAN NOT NULL DEFAULT FALSE,
                created_at BIGINT NOT NULL,
                UNIQUE KEY uq_mechanics_username (username),
                UNIQUE KEY uq_mechanics_email (email)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// True when `username` or `email` is taken by either role.
    pub async fn identity_exists(&self, username: &str, email: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT id FROM customers WHERE username = ? OR email = ? \
             UNION SELECT id FROM mechanics WHERE username = ? OR email = ? LIMIT 1",
        )
        .bind(username)
        .bind(email)
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    pub async fn insert(&self, actor: &NewActor) -> Result<i64> {
        actor.validate()?;

        if self.identity_exists(&actor.username, &actor.email).await? {
            return Err(PlatformError::duplicate(
                "username or email already exists",
            ));
        }

        let now = Utc::now().timestamp_millis();
        let result = match actor.role {
            ActorRole::Customer => {
                sqlx::query(
                    "INSERT INTO customers (name, username, mobile, email, password_hash, created_at) \
                     VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(&actor.name)
                .bind(&actor.username)
                .bind(&actor.mobile)
                .bind(&actor.email)
                .bind(&actor.password_hash)
                .bind(now)
                .execute(&self.pool)
                .await
            }
            ActorRole::Mechanic => {
                sqlx::query(
                    "INSERT INTO mechanics (name, username, mobile, email, password_hash, latitude, longitude, created_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(&actor.name)
                .bind(&actor.username)
                .bind(&actor.mobile)
                .bind(&actor.email)
                .bind(&actor.password_hash)
                .bind(actor.latitude)
                .bind(actor.longitude)
                .bind(now)
                .execute(&self.pool)
                .await
            }
        }
        .map_err(duplicate_identity)?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn find_by_id(&self, role: ActorRole, id: i64) -> Result<Option<Actor>> {
        let row = match role {
            ActorRole::Customer => {
                sqlx::query(
                    "SELECT id, name, username, mobile, email, password_hash, created_at \
                     FROM customers WHERE id = ?",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
            ActorRole::Mechanic => {
                sqlx::query(
                    "SELECT id, name, username, mobile, email, password_hash, latitude, longitude, is_available, created_at \
                     FROM mechanics WHERE id = ?",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
        };
        row.map(|r| Self::actor_from_row(role, &r)).transpose()
    }

    pub async fn find_by_username(
        &self,
        role: ActorRole,
        username: &str,
    ) -> Result<Option<Actor>> {
        let row = match role {
            ActorRole::Customer => {
                sqlx::query(
                    "SELECT id, name, username, mobile, email, password_hash, created_at \
                     FROM customers WHERE username = ?",
                )
                .bind(username)
                .fetch_optional(&self.pool)
                .await?
            }
            ActorRole::Mechanic => {
                sqlx::query(
                    "SELECT id, name, username, mobile, email, password_hash, latitude, longitude, is_available, created_at \
                     FROM mechanics WHERE username = ?",
                )
                .bind(username)
                .fetch_optional(&self.pool)
                .await?
            }
        };
        row.map(|r| Self::actor_from_row(role, &r)).transpose()
    }

    /// Look up an actor by email, checking both roles.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Actor>> {
        let row = sqlx::query(
            "SELECT id, name, username, mobile, email, password_hash, created_at \
             FROM customers WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(row) = row {
            return Ok(Some(Self::actor_from_row(ActorRole::Customer, &row)?));
        }

        let row = sqlx::query(
            "SELECT id, name, username, mobile, email, password_hash, latitude, longitude, is_available, created_at \
             FROM mechanics WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| Self::actor_from_row(ActorRole::Mechanic, &r))
            .transpose()
    }

    pub async fn update_profile(
        &self,
        role: ActorRole,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<()> {
        match role {
            ActorRole::Customer => {
                sqlx::query("UPDATE customers SET name = ?, mobile = ?, email = ? WHERE id = ?")
                    .bind(&update.name)
                    .bind(&update.mobile)
                    .bind(&update.email)
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
            ActorRole::Mechanic => {
                if update.latitude.is_none() || update.longitude.is_none() {
                    return Err(PlatformError::validation(
                        "Mechanic must provide latitude and longitude",
                    ));
                }
                sqlx::query(
                    "UPDATE mechanics SET name = ?, mobile = ?, email = ?, latitude = ?, longitude = ? WHERE id = ?",
                )
                .bind(&update.name)
                .bind(&update.mobile)
                .bind(&update.email)
                .bind(update.latitude)
                .bind(update.longitude)
                .bind(id)
                .execute(&self.pool)
                .await
            }
        }
        .map_err(duplicate_identity)?;
        Ok(())
    }

    pub async fn update_password(
        &self,
        role: ActorRole,
        id: i64,
        password_hash: &str,
    ) -> Result<()> {
        let query = match role {
            ActorRole::Customer => "UPDATE customers SET password_hash = ? WHERE id = ?",
            ActorRole::Mechanic => "UPDATE mechanics SET password_hash = ? WHERE id = ?",
        };
        sqlx::query(query)
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_availability(&self, mechanic_id: i64) -> Result<Option<bool>> {
        let row = sqlx::query("SELECT is_available FROM mechanics WHERE id = ?")
            .bind(mechanic_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get::<bool, _>("is_available")))
    }

    pub async fn set_availability(&self, mechanic_id: i64, is_available: bool) -> Result<()> {
        sqlx::query("UPDATE mechanics SET is_available = ? WHERE id = ?")
            .bind(is_available)
            .bind(mechanic_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, role: ActorRole, id: i64) -> Result<bool> {
        let query = match role {
            ActorRole::Customer => "DELETE FROM customers WHERE id = ?",
            ActorRole::Mechanic => "DELETE FROM mechanics WHERE id = ?",
        };
        let result = sqlx::query(query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    fn actor_from_row(role: ActorRole, row: &MySqlRow) -> Result<Actor> {
        let created_at_ts: i64 = row.get("created_at");
        let created_at = DateTime::from_timestamp_millis(created_at_ts)
            .ok_or_else(|| PlatformError::internal("Invalid timestamp"))?;

        let (latitude, longitude, is_available) = match role {
            ActorRole::Customer => (None, None, false),
            ActorRole::Mechanic => (
                Some(row.get("latitude")),
                Some(row.get("longitude")),
                row.get("is_available"),
            ),
        };

        Ok(Actor {
            id: row.get("id"),
            role,
            name: row.get("name"),
            username: row.get("username"),
            mobile: row.get("mobile"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            latitude,
            longitude,
            is_available,
            created_at,
        })
    }
}
