//! Loan origination: customer underwriting data, metric calculators, the
//! hard-rule eligibility evaluator, and the decision orchestrator that
//! blends automatic policy with auditable advisor overrides.

pub mod domain;
pub mod evaluation;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Account, AccountId, AccountKind, Customer, CustomerId, DecisionSource, EligibilitySnapshot,
    EmploymentType, Loan, LoanId, LoanPurpose, LoanStatus,
};
pub use evaluation::{
    DecisionEngine, EligibilityEvaluator, EligibilityReport, HardRejection, LendingPolicy,
    LoanDecision, PolicyValue, ReviewerOverrides, RuleKind, RuleViolation,
};
pub use metrics::{
    debt_to_income, employment_score, DtiBreakdown, DtiRiskLevel, DtiView, EmploymentView,
    StabilityLevel,
};
pub use repository::{
    AccountStore, CustomerStore, CustomerSummary, LoanNotice, LoanStore, NotificationError,
    NotificationSink, StoreError,
};
pub use router::lending_router;
pub use service::{
    ApplicationOutcome, LoanApplication, LoanOriginationService, OriginationError,
};
