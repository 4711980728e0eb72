use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use teller::lending::{
    Account, AccountId, AccountKind, AccountStore, Customer, CustomerId, CustomerStore,
    CustomerSummary, EmploymentType, LendingPolicy, Loan, LoanNotice, LoanStore,
    NotificationError, NotificationSink, StoreError,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCustomerStore {
    customers: Arc<Mutex<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomerStore {
    pub(crate) fn with_customers(customers: Vec<Customer>) -> Self {
        let map = customers
            .into_iter()
            .map(|customer| (customer.customer_id.clone(), customer))
            .collect();
        Self {
            customers: Arc::new(Mutex::new(map)),
        }
    }
}

impl CustomerStore for InMemoryCustomerStore {
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
pub(crate) struct InMemoryAccountStore {
    accounts: Arc<Mutex<Vec<Account>>>,
}

impl InMemoryAccountStore {
    pub(crate) fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
        }
    }
}

impl AccountStore for InMemoryAccountStore {
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
pub(crate) struct InMemoryLoanStore {
    loans: Arc<Mutex<Vec<Loan>>>,
}

impl LoanStore for InMemoryLoanStore {
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

/// Logs notices instead of delivering them; the real email/SMS/PDF adapters
/// sit behind the same trait out of process.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotificationSink {
    events: Arc<Mutex<Vec<LoanNotice>>>,
}

impl LoggingNotificationSink {
    pub(crate) fn events(&self) -> Vec<LoanNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl NotificationSink for LoggingNotificationSink {
    fn publish(&self, notice: LoanNotice) -> Result<(), NotificationError> {
        info!(
            template = %notice.template,
            customer_id = %notice.customer_id,
            loan_id = %notice.loan_id,
            "loan notice dispatched"
        );
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(crate) fn default_lending_policy() -> LendingPolicy {
    LendingPolicy::default()
}

/// Deposit accounts for the seeded profiles.
pub(crate) fn seed_accounts() -> Vec<Account> {
    vec![
        Account {
            account_id: AccountId("ACC-2001".to_string()),
            customer_id: CustomerId("CUST-1001".to_string()),
            kind: AccountKind::Checking,
            balance: 4_820.50,
            currency: "USD".to_string(),
        },
        Account {
            account_id: AccountId("ACC-2002".to_string()),
            customer_id: CustomerId("CUST-1001".to_string()),
            kind: AccountKind::Savings,
            balance: 18_300.00,
            currency: "USD".to_string(),
        },
        Account {
            account_id: AccountId("ACC-2003".to_string()),
            customer_id: CustomerId("CUST-1002".to_string()),
            kind: AccountKind::Checking,
            balance: 940.75,
            currency: "USD".to_string(),
        },
        Account {
            account_id: AccountId("ACC-2004".to_string()),
            customer_id: CustomerId("CUST-1003".to_string()),
            kind: AccountKind::Savings,
            balance: 6_150.25,
            currency: "USD".to_string(),
        },
    ]
}

/// Demo fixtures matching the seeded document-store profiles the chat
/// frontend exercises.
pub(crate) fn seed_customers() -> Vec<Customer> {
    vec![
        Customer {
            customer_id: CustomerId("CUST-1001".to_string()),
            name: "Maya Lindqvist".to_string(),
            email: "maya.lindqvist@example.com".to_string(),
            phone: "+1-515-555-0114".to_string(),
            annual_income: 72_000.0,
            credit_score: 731,
            employment_type: Some(EmploymentType::Permanent),
            years_with_employer: Some(5.5),
            business_years: None,
            risk_flags: BTreeSet::new(),
        },
        Customer {
            customer_id: CustomerId("CUST-1002".to_string()),
            name: "Jordan Okafor".to_string(),
            email: "jordan.okafor@example.com".to_string(),
            phone: "+1-515-555-0167".to_string(),
            annual_income: 38_000.0,
            credit_score: 612,
            employment_type: Some(EmploymentType::Contract),
            years_with_employer: Some(1.0),
            business_years: None,
            risk_flags: BTreeSet::new(),
        },
        Customer {
            customer_id: CustomerId("CUST-1003".to_string()),
            name: "Priya Raman".to_string(),
            email: "priya.raman@example.com".to_string(),
            phone: "+1-515-555-0193".to_string(),
            annual_income: 54_000.0,
            credit_score: 488,
            employment_type: Some(EmploymentType::SelfEmployed),
            years_with_employer: None,
            business_years: Some(4.0),
            risk_flags: ["collections".to_string()].into_iter().collect(),
        },
    ]
}
