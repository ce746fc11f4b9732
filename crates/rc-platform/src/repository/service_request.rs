//! Service Request Repository
//!
//! Owns the request lifecycle statements. Approve and reject overwrite the
//! status unconditionally, matching the observed backend behavior; only
//! approve probes for existence first.

use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use crate::domain::{NewServiceRequest, RequestStatus, ServiceRequest};
use crate::error::{PlatformError, Result};

pub struct ServiceRequestRepository {
    pool: MySqlPool,
}

impl ServiceRequestRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS service_requests (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                customer_name VARCHAR(255) NOT NULL,
                phone_number VARCHAR(50) NOT NULL,
                service_type VARCHAR(100) NOT NULL,
                location TEXT NOT NULL,
                user_id BIGINT,
                mechanic_id BIGINT,
                status VARCHAR(20) NOT NULL DEFAULT 'PENDING',
                created_at BIGINT NOT NULL,
                INDEX idx_requests_user (user_id, created_at),
                INDEX idx_requests_inbox (status, mechanic_id, created_at)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert(&self, request: &NewServiceRequest) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO service_requests (customer_name, phone_number, service_type, location, user_id, status, created_at) \
             VALUES (?, ?, ?, ?, ?, 'PENDING', ?)",
        )
        .bind(&request.customer_name)
        .bind(&request.phone_number)
        .bind(&request.service_type)
        .bind(&request.location)
        .bind(request.user_id)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ServiceRequest>> {
        let row = sqlx::query(
            "SELECT id, customer_name, phone_number, service_type, location, user_id, mechanic_id, status, created_at \
             FROM service_requests WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| Self::request_from_row(&r)).transpose()
    }

    /// Assign `mechanic_id` and mark the request approved.
    pub async fn approve(&self, id: i64, mechanic_id: i64) -> Result<()> {
        let exists = sqlx::query("SELECT id FROM service_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if !exists {
            return Err(PlatformError::not_found("ServiceRequest", id.to_string()));
        }

        sqlx::query("UPDATE service_requests SET status = 'APPROVED', mechanic_id = ? WHERE id = ?")
            .bind(mechanic_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Mark the request rejected; `mechanic_id` is left untouched.
    pub async fn reject(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE service_requests SET status = 'REJECTED' WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_for_customer(&self, user_id: i64) -> Result<Vec<ServiceRequest>> {
        let rows = sqlx::query(
            "SELECT id, customer_name, phone_number, service_type, location, user_id, mechanic_id, status, created_at \
             FROM service_requests WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::request_from_row).collect()
    }

    /// The mechanic inbox: everything unclaimed plus everything this mechanic
    /// already claimed, newest first.
    pub async fn list_for_mechanic(&self, mechanic_id: i64) -> Result<Vec<ServiceRequest>> {
        let rows = sqlx::query(
            "SELECT id, customer_name, phone_number, service_type, location, user_id, mechanic_id, status, created_at \
             FROM service_requests WHERE status = 'PENDING' OR mechanic_id = ? ORDER BY created_at DESC",
        )
        .bind(mechanic_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::request_from_row).collect()
    }

    fn request_from_row(row: &MySqlRow) -> Result<ServiceRequest> {
        let created_at_ts: i64 = row.get("created_at");
        let created_at = DateTime::from_timestamp_millis(created_at_ts)
            .ok_or_else(|| PlatformError::internal("Invalid timestamp"))?;

        let status_str: String = row.get("status");
        let status = RequestStatus::parse(&status_str).ok_or_else(|| {
            PlatformError::internal(format!("Unknown request status: {}", status_str))
        })?;

        Ok(ServiceRequest {
            id: row.get("id"),
            customer_name: row.get("customer_name"),
            phone_number: row.get("phone_number"),
            service_type: row.get("service_type"),
            location: row.get("location"),
            user_id: row.get("user_id"),
            mechanic_id: row.get("mechanic_id"),
            status,
            created_at,
        })
    }
}
