//! # Customer Repository
//!
//! Database operations for the customer directory.
//!
//! Code allocation lives in [`crate::repository::sequence`]; this
//! repository only creates and reads customers.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use quote_core::{validation, Customer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Creates a customer. The 4-digit code stays unallocated until the
    /// first quotation is saved for them.
    pub async fn create(&self, name: &str, phone: Option<&str>) -> DbResult<Customer> {
        validation::validate_quotation_name(name).map_err(DbError::Validation)?;

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            phone: phone.map(|p| p.to_string()),
            code: None,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %customer.id, name = %customer.name, "Creating customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, code, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.code)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, code, created_at, updated_at FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let created = repo.create("Sharma Interiors", Some("98200 00000")).await.unwrap();
        assert_eq!(created.code, None);

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Sharma Interiors");
        assert_eq!(fetched.code, None);
    }

    #[tokio::test]
    async fn test_blank_name_rejected_as_validation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.customers().create("   ", None).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
