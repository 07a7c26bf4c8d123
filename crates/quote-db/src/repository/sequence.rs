//! # Sequence Allocation
//!
//! Customer codes and quotation numbers.
//!
//! ## Quotation Number Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     "#QT" + "0101" + "A"                                │
//! │                       │       │       │                                 │
//! │                    prefix  customer  per-customer                       │
//! │                            code      letter suffix                      │
//! │                                                                         │
//! │  Customer codes: 4-digit, zero-padded, strictly increasing from        │
//! │  "0101", allocated once per customer and never changed.                │
//! │                                                                         │
//! │  Letter suffix: bijective base-26 over the customer's quotation        │
//! │  count — "A".."Z", then "AA", "AB", ...                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! Both allocations are read-then-write sequences, so both are protected
//! by UNIQUE indexes instead of trusting the read: a concurrent claim of
//! the same code or number fails the constraint and the loser retries
//! with a fresh read. Retrying the letter suffix also walks past holes
//! left by deleted quotations.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

/// Prefix every quotation number carries.
pub const QUOTATION_NUMBER_PREFIX: &str = "#QT";

/// First customer code ever allocated.
const FIRST_CUSTOMER_CODE: i64 = 101;

/// Bounded retries for constraint-race losers.
const MAX_ALLOC_ATTEMPTS: u32 = 10;

/// Allocator for customer codes and quotation numbers.
#[derive(Debug, Clone)]
pub struct SequenceAllocator {
    pool: SqlitePool,
}

impl SequenceAllocator {
    /// Creates a new SequenceAllocator.
    pub fn new(pool: SqlitePool) -> Self {
        SequenceAllocator { pool }
    }

    /// Returns the customer's stable 4-digit code, allocating the next
    /// unused one on first use.
    ///
    /// ## Concurrency
    /// Claim-by-constraint: the max-code read and the claiming UPDATE run
    /// in one transaction, and `idx_customers_code` (UNIQUE) rejects a
    /// doubly-claimed code at commit. The loser re-reads and tries the
    /// next code.
    pub async fn allocate_customer_code(&self, customer_id: &str) -> DbResult<String> {
        for attempt in 0..MAX_ALLOC_ATTEMPTS {
            let mut tx = self.pool.begin().await?;

            let existing: Option<Option<String>> =
                sqlx::query_scalar("SELECT code FROM customers WHERE id = ?1")
                    .bind(customer_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let Some(existing) = existing else {
                return Err(DbError::not_found("Customer", customer_id));
            };
            if let Some(code) = existing {
                return Ok(code);
            }

            let max_code: Option<i64> = sqlx::query_scalar(
                "SELECT MAX(CAST(code AS INTEGER)) FROM customers WHERE code IS NOT NULL",
            )
            .fetch_one(&mut *tx)
            .await?;

            let next = max_code.unwrap_or(FIRST_CUSTOMER_CODE - 1) + 1;
            let code = format!("{:04}", next);

            // SQLite raises the UNIQUE violation on the statement itself,
            // so the claim and the commit are both inside the retry match.
            let claimed = sqlx::query("UPDATE customers SET code = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(customer_id)
                .bind(&code)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await
                .map_err(DbError::from);

            match claimed {
                Ok(_) => {
                    tx.commit().await?;
                    debug!(customer_id = %customer_id, code = %code, "Allocated customer code");
                    return Ok(code);
                }
                Err(e) if e.violates_unique("customers.code") => {
                    tx.rollback().await.ok();
                    warn!(
                        customer_id = %customer_id,
                        code = %code,
                        attempt,
                        "Customer code claimed concurrently, retrying"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(DbError::AllocationExhausted {
            attempts: MAX_ALLOC_ATTEMPTS,
            context: format!("customer code for {customer_id}"),
        })
    }

    /// Builds the quotation number candidate for a customer, offset by the
    /// retry attempt so collision losers (and holes left by deletions)
    /// converge on a free suffix.
    ///
    /// The INSERT that reserves the number happens in the quotation save
    /// transaction; the UNIQUE constraint on `quotation_number` is what
    /// makes the reservation atomic.
    pub async fn next_quotation_number(
        &self,
        customer_id: &str,
        customer_code: &str,
        attempt: u32,
    ) -> DbResult<String> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM quotations WHERE customer_id = ?1")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(format_quotation_number(
            customer_code,
            count + attempt as i64,
        ))
    }
}

/// `"#QT" + code + letter_suffix(n)`.
pub fn format_quotation_number(customer_code: &str, n: i64) -> String {
    format!(
        "{}{}{}",
        QUOTATION_NUMBER_PREFIX,
        customer_code,
        letter_suffix(n)
    )
}

/// Bijective base-26 letter suffix: 0→"A", 25→"Z", 26→"AA", 27→"AB", ...
///
/// The single-letter scheme is undefined past 26 quotations per customer;
/// multi-letter continuation keeps numbers unique without a schema change.
pub fn letter_suffix(n: i64) -> String {
    let mut n = n.max(0);
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (n % 26) as u8);
        n = n / 26 - 1;
        if n < 0 {
            break;
        }
    }
    letters.reverse();
    // Only ASCII uppercase bytes are ever pushed
    String::from_utf8(letters).unwrap_or_else(|_| "A".to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[test]
    fn test_letter_suffix_single_letters() {
        assert_eq!(letter_suffix(0), "A");
        assert_eq!(letter_suffix(1), "B");
        assert_eq!(letter_suffix(25), "Z");
    }

    #[test]
    fn test_letter_suffix_continues_past_z() {
        assert_eq!(letter_suffix(26), "AA");
        assert_eq!(letter_suffix(27), "AB");
        assert_eq!(letter_suffix(51), "AZ");
        assert_eq!(letter_suffix(52), "BA");
        assert_eq!(letter_suffix(701), "ZZ");
        assert_eq!(letter_suffix(702), "AAA");
    }

    #[test]
    fn test_format_quotation_number() {
        assert_eq!(format_quotation_number("0101", 0), "#QT0101A");
        assert_eq!(format_quotation_number("0102", 2), "#QT0102C");
    }

    #[tokio::test]
    async fn test_first_code_is_0101_and_stable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db.customers().create("First Co", None).await.unwrap();

        let code = db.sequences().allocate_customer_code(&customer.id).await.unwrap();
        assert_eq!(code, "0101");

        // Second call returns the same code, no new allocation
        let again = db.sequences().allocate_customer_code(&customer.id).await.unwrap();
        assert_eq!(again, "0101");
    }

    #[tokio::test]
    async fn test_codes_strictly_increase() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = db.customers().create("A", None).await.unwrap();
        let b = db.customers().create("B", None).await.unwrap();
        let c = db.customers().create("C", None).await.unwrap();

        assert_eq!(db.sequences().allocate_customer_code(&a.id).await.unwrap(), "0101");
        assert_eq!(db.sequences().allocate_customer_code(&b.id).await.unwrap(), "0102");
        assert_eq!(db.sequences().allocate_customer_code(&c.id).await.unwrap(), "0103");
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.sequences().allocate_customer_code("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
