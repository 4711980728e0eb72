use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Account, Customer, CustomerId, Loan, LoanId};

/// Lightweight customer row for listings that only need id and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: CustomerId,
    pub name: String,
}

/// Read access to the customer collection of the document store.
pub trait CustomerStore: Send + Sync {
    fn fetch(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError>;
    fn list_summaries(&self) -> Result<Vec<CustomerSummary>, StoreError>;
}

/// Access to the loan collection. The engine performs exactly one read
/// (loans for a customer) and one write (insert) per application; it never
/// retries either.
pub trait LoanStore: Send + Sync {
    fn insert(&self, loan: Loan) -> Result<Loan, StoreError>;
    fn for_customer(&self, id: &CustomerId) -> Result<Vec<Loan>, StoreError>;
}

/// Read access to the deposit-account collection.
pub trait AccountStore: Send + Sync {
    fn for_customer(&self, id: &CustomerId) -> Result<Vec<Account>, StoreError>;
}

/// Error enumeration for store failures, propagated unchanged to callers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook. Email, SMS, and PDF statement delivery all
/// live behind this seam; the engine only hands off the payload.
pub trait NotificationSink: Send + Sync {
    fn publish(&self, notice: LoanNotice) -> Result<(), NotificationError>;
}

/// Notification payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanNotice {
    pub template: String,
    pub customer_id: CustomerId,
    pub loan_id: LoanId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
