use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::lending::domain::{
    Account, AccountId, AccountKind, Customer, CustomerId, DecisionSource, EligibilitySnapshot,
    EmploymentType, Loan, LoanId, LoanPurpose, LoanStatus,
};
use crate::lending::evaluation::{DecisionEngine, EligibilityEvaluator, LendingPolicy};
use crate::lending::repository::{
    AccountStore, CustomerStore, CustomerSummary, LoanNotice, LoanStore, NotificationError,
    NotificationSink, StoreError,
};
use crate::lending::router::lending_router;
use crate::lending::service::LoanOriginationService;

pub(super) fn policy() -> LendingPolicy {
    LendingPolicy::default()
}

pub(super) fn evaluator() -> EligibilityEvaluator {
    EligibilityEvaluator::new(policy())
}

pub(super) fn engine() -> DecisionEngine {
    DecisionEngine::new(policy())
}

/// Baseline customer that passes every hard rule: permanent employment with
/// long tenure, clean flags, solid income and credit.
pub(super) fn customer(id: &str, credit_score: u16, annual_income: f64) -> Customer {
    Customer {
        customer_id: CustomerId(id.to_string()),
        name: "Dana Whitfield".to_string(),
        email: "dana.whitfield@example.com".to_string(),
        phone: "+1-515-555-0142".to_string(),
        annual_income,
        credit_score,
        employment_type: Some(EmploymentType::Permanent),
        years_with_employer: Some(6.0),
        business_years: None,
        risk_flags: BTreeSet::new(),
    }
}

pub(super) fn snapshot() -> EligibilitySnapshot {
    EligibilitySnapshot {
        credit_score: 720,
        active_loan_count: 0,
        annual_income: 60_000.0,
        current_dti: Some(0.0),
        projected_dti: Some(0.25),
        loan_to_income_ratio: Some(0.25),
        employment_score: 1.0,
        risk_flags: Vec::new(),
    }
}

pub(super) fn active_loan(customer_id: &str, remaining_balance: f64) -> Loan {
    Loan {
        loan_id: LoanId(format!("LN-FIX-{remaining_balance:.0}")),
        customer_id: CustomerId(customer_id.to_string()),
        amount: remaining_balance,
        purpose: LoanPurpose::Personal,
        status: LoanStatus::Active,
        remaining_balance,
        decision_source: DecisionSource::SystemAuto,
        decision_reason: "meets_all_criteria".to_string(),
        eligibility_details: snapshot(),
        created_at: Utc::now(),
    }
}

pub(super) fn account(account_id: &str, customer_id: &str, balance: f64) -> Account {
    Account {
        account_id: AccountId(account_id.to_string()),
        customer_id: CustomerId(customer_id.to_string()),
        kind: AccountKind::Checking,
        balance,
        currency: "USD".to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCustomerStore {
    customers: Arc<Mutex<HashMap<CustomerId, Customer>>>,
}

impl MemoryCustomerStore {
    pub(super) fn with(customers: Vec<Customer>) -> Self {
        let map = customers
            .into_iter()
            .map(|customer| (customer.customer_id.clone(), customer))
            .collect();
        Self {
            customers: Arc::new(Mutex::new(map)),
        }
    }
}

impl CustomerStore for MemoryCustomerStore {
    fn fetch(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError> {
        let guard = self.customers.lock().expect("customer mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_summaries(&self) -> Result<Vec<CustomerSummary>, StoreError> {
        let guard = self.customers.lock().expect("customer mutex poisoned");
        let mut summaries: Vec<CustomerSummary> = guard
            .values()
            .map(|customer| CustomerSummary {
                customer_id: customer.customer_id.clone(),
                name: customer.name.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));
        Ok(summaries)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLoanStore {
    pub(super) loans: Arc<Mutex<Vec<Loan>>>,
}

impl MemoryLoanStore {
    pub(super) fn all(&self) -> Vec<Loan> {
        self.loans.lock().expect("loan mutex poisoned").clone()
    }
}

impl LoanStore for MemoryLoanStore {
    fn insert(&self, loan: Loan) -> Result<Loan, StoreError> {
        let mut guard = self.loans.lock().expect("loan mutex poisoned");
        if guard.iter().any(|existing| existing.loan_id == loan.loan_id) {
            return Err(StoreError::Conflict);
        }
        guard.push(loan.clone());
        Ok(loan)
    }

    fn for_customer(&self, id: &CustomerId) -> Result<Vec<Loan>, StoreError> {
        let guard = self.loans.lock().expect("loan mutex poisoned");
        Ok(guard
            .iter()
            .filter(|loan| &loan.customer_id == id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAccountStore {
    accounts: Arc<Mutex<Vec<Account>>>,
}

impl MemoryAccountStore {
    pub(super) fn with(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
        }
    }
}

impl AccountStore for MemoryAccountStore {
    fn for_customer(&self, id: &CustomerId) -> Result<Vec<Account>, StoreError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard
            .iter()
            .filter(|account| &account.customer_id == id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotices {
    events: Arc<Mutex<Vec<LoanNotice>>>,
}

impl MemoryNotices {
    pub(super) fn events(&self) -> Vec<LoanNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl NotificationSink for MemoryNotices {
    fn publish(&self, notice: LoanNotice) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct FailingNotices;

impl NotificationSink for FailingNotices {
    fn publish(&self, _notice: LoanNotice) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

pub(super) struct UnavailableLoanStore;

impl LoanStore for UnavailableLoanStore {
    fn insert(&self, _loan: Loan) -> Result<Loan, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn for_customer(&self, _id: &CustomerId) -> Result<Vec<Loan>, StoreError> {
        Ok(Vec::new())
    }
}

pub(super) type MemoryService =
    LoanOriginationService<MemoryCustomerStore, MemoryAccountStore, MemoryLoanStore, MemoryNotices>;

pub(super) fn build_service(
    customers: Vec<Customer>,
) -> (MemoryService, Arc<MemoryLoanStore>, Arc<MemoryNotices>) {
    build_service_with_accounts(customers, Vec::new())
}

pub(super) fn build_service_with_accounts(
    customers: Vec<Customer>,
    accounts: Vec<Account>,
) -> (MemoryService, Arc<MemoryLoanStore>, Arc<MemoryNotices>) {
    let customer_store = Arc::new(MemoryCustomerStore::with(customers));
    let account_store = Arc::new(MemoryAccountStore::with(accounts));
    let loan_store = Arc::new(MemoryLoanStore::default());
    let notices = Arc::new(MemoryNotices::default());
    let service = LoanOriginationService::new(
        customer_store,
        account_store,
        loan_store.clone(),
        notices.clone(),
        policy(),
    );
    (service, loan_store, notices)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    lending_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
