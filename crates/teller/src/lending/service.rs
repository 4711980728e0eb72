use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{Account, Customer, CustomerId, Loan, LoanId, LoanPurpose, LoanStatus};
use super::evaluation::{
    DecisionEngine, EligibilityReport, HardRejection, LendingPolicy, LoanDecision,
    ReviewerOverrides,
};
use super::metrics::{
    debt_to_income, employment_score, DtiRiskLevel, DtiView, EmploymentView, StabilityLevel,
};
use super::repository::{
    AccountStore, CustomerStore, CustomerSummary, LoanNotice, LoanStore, NotificationError,
    NotificationSink, StoreError,
};

/// Inbound payload for a new loan application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub customer_id: CustomerId,
    pub amount: f64,
    pub purpose: LoanPurpose,
    #[serde(default)]
    pub force_approve: bool,
    #[serde(default)]
    pub force_reject: bool,
}

/// Result of an application: either a booked loan record or a structured
/// hard-rule refusal. The refusal is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationOutcome {
    Booked(Loan),
    Refused(HardRejection),
}

static LOAN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_loan_id() -> LoanId {
    let id = LOAN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LoanId(format!("LN-{id:06}"))
}

/// Service composing the customer/account/loan stores, the decision engine,
/// and the notification sink.
pub struct LoanOriginationService<C, A, L, N> {
    customers: Arc<C>,
    accounts: Arc<A>,
    loans: Arc<L>,
    notices: Arc<N>,
    engine: Arc<DecisionEngine>,
}

impl<C, A, L, N> LoanOriginationService<C, A, L, N>
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(
        customers: Arc<C>,
        accounts: Arc<A>,
        loans: Arc<L>,
        notices: Arc<N>,
        policy: LendingPolicy,
    ) -> Self {
        Self {
            customers,
            accounts,
            loans,
            notices,
            engine: Arc::new(DecisionEngine::new(policy)),
        }
    }

    /// The rule constants as enforced, for the read-only policy endpoint.
    pub fn policy(&self) -> &LendingPolicy {
        self.engine.policy()
    }

    fn require_customer(&self, id: &CustomerId) -> Result<Customer, OriginationError> {
        self.customers
            .fetch(id)?
            .ok_or_else(|| OriginationError::CustomerNotFound(id.clone()))
    }

    fn active_loans(&self, id: &CustomerId) -> Result<Vec<Loan>, OriginationError> {
        let loans = self.loans.for_customer(id)?;
        Ok(loans
            .into_iter()
            .filter(|loan| loan.status.is_active())
            .collect())
    }

    fn validate_amount(amount: f64) -> Result<(), OriginationError> {
        if amount.is_finite() && amount > 0.0 {
            Ok(())
        } else {
            Err(OriginationError::InvalidAmount { amount })
        }
    }

    /// Side-effect-free eligibility check: same input and unchanged store
    /// state yield an identical report.
    pub fn check_eligibility(
        &self,
        customer_id: &CustomerId,
        proposed_amount: f64,
    ) -> Result<EligibilityReport, OriginationError> {
        Self::validate_amount(proposed_amount)?;
        let customer = self.require_customer(customer_id)?;
        let active = self.active_loans(customer_id)?;
        Ok(self
            .engine
            .evaluator()
            .evaluate(&customer, proposed_amount, &active))
    }

    /// Apply for a loan. Each call books a new record; the caller owns any
    /// request-level deduplication. Two racing applications may both read a
    /// slightly stale active-loan count, so the exposure limit is enforced
    /// best-effort against the store snapshot.
    pub fn apply(
        &self,
        application: LoanApplication,
    ) -> Result<ApplicationOutcome, OriginationError> {
        Self::validate_amount(application.amount)?;
        let customer = self.require_customer(&application.customer_id)?;
        let active = self.active_loans(&application.customer_id)?;

        let overrides = ReviewerOverrides {
            force_approve: application.force_approve,
            force_reject: application.force_reject,
        };

        let terms = match self
            .engine
            .decide(&customer, application.amount, &active, overrides)
        {
            LoanDecision::HardRejection(rejection) => {
                return Ok(ApplicationOutcome::Refused(rejection))
            }
            LoanDecision::Decided(terms) => terms,
        };

        let loan = Loan {
            loan_id: next_loan_id(),
            customer_id: application.customer_id,
            amount: application.amount,
            purpose: application.purpose,
            status: terms.status,
            remaining_balance: application.amount,
            decision_source: terms.decision_source,
            decision_reason: terms.decision_reason,
            eligibility_details: terms.details,
            created_at: Utc::now(),
        };

        let stored = self.loans.insert(loan)?;

        if stored.status == LoanStatus::Active {
            let mut details = BTreeMap::new();
            details.insert("status".to_string(), stored.status.label().to_string());
            details.insert("reason".to_string(), stored.decision_reason.clone());
            let notice = LoanNotice {
                template: "loan_approved".to_string(),
                customer_id: stored.customer_id.clone(),
                loan_id: stored.loan_id.clone(),
                details,
            };
            // The decision stands once the record is written; delivery is a
            // side channel and failures are not surfaced to the applicant.
            if let Err(err) = self.notices.publish(notice) {
                warn!(loan_id = %stored.loan_id, "loan notice delivery failed: {err}");
            }
        }

        Ok(ApplicationOutcome::Booked(stored))
    }

    pub fn customer(&self, id: &CustomerId) -> Result<Customer, OriginationError> {
        self.require_customer(id)
    }

    pub fn customers(&self) -> Result<Vec<CustomerSummary>, OriginationError> {
        Ok(self.customers.list_summaries()?)
    }

    pub fn loans_for(&self, id: &CustomerId) -> Result<Vec<Loan>, OriginationError> {
        self.require_customer(id)?;
        Ok(self.loans.for_customer(id)?)
    }

    /// Accounts held by a customer. An unknown customer and a known customer
    /// with no accounts report as distinct not-found conditions.
    pub fn accounts_for(&self, id: &CustomerId) -> Result<Vec<Account>, OriginationError> {
        let accounts = self.accounts.for_customer(id)?;
        if accounts.is_empty() {
            self.require_customer(id)?;
            return Err(OriginationError::AccountsNotFound(id.clone()));
        }
        Ok(accounts)
    }

    /// Current-debt DTI snapshot for display. Reports `invalid_income`
    /// rather than a zero ratio when income is not positive.
    pub fn dti_report(&self, id: &CustomerId) -> Result<DtiView, OriginationError> {
        let customer = self.require_customer(id)?;
        let active = self.active_loans(id)?;
        let breakdown = debt_to_income(&customer, &active, 0.0);

        Ok(DtiView {
            customer_id: customer.customer_id,
            monthly_income: breakdown.monthly_income,
            existing_monthly_debt: breakdown.existing_monthly_debt,
            dti: breakdown.ratio,
            risk_level: DtiRiskLevel::from_ratio(breakdown.ratio),
            active_loans_count: active.len() as u32,
        })
    }

    /// Employment stability snapshot for display.
    pub fn employment_report(&self, id: &CustomerId) -> Result<EmploymentView, OriginationError> {
        let customer = self.require_customer(id)?;
        let score = employment_score(&customer);

        Ok(EmploymentView {
            customer_id: customer.customer_id,
            employment_type: customer.employment_type,
            years_with_employer: customer.years_with_employer,
            business_years: customer.business_years,
            employment_score: score,
            stability_level: StabilityLevel::from_score(score),
        })
    }
}

/// Error raised by the origination service.
#[derive(Debug, thiserror::Error)]
pub enum OriginationError {
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error("no accounts found for customer {0}")]
    AccountsNotFound(CustomerId),
    #[error("loan amount must be a positive finite number, got {amount}")]
    InvalidAmount { amount: f64 },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
