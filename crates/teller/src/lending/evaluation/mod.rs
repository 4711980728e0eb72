mod config;
mod decision;
mod rules;

pub use config::LendingPolicy;
pub use decision::{
    DecidedTerms, DecisionEngine, HardRejection, LoanDecision, ReviewerOverrides,
    REASON_AMOUNT_REVIEW, REASON_CREDIT_REVIEW, REASON_MANUAL_APPROVAL, REASON_MANUAL_REJECTION,
    REASON_MEETS_CRITERIA,
};

use serde::{Deserialize, Serialize};

use super::domain::{Customer, EligibilitySnapshot, Loan};

/// Stateless evaluator applying the hard-rule battery to a customer and a
/// proposed amount. Read-only; a fresh report is built on every call.
pub struct EligibilityEvaluator {
    policy: LendingPolicy,
}

impl EligibilityEvaluator {
    pub fn new(policy: LendingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    pub fn evaluate(
        &self,
        customer: &Customer,
        proposed_amount: f64,
        active_loans: &[Loan],
    ) -> EligibilityReport {
        let (violations, details) =
            rules::check_rules(customer, proposed_amount, active_loans, &self.policy);

        EligibilityReport {
            eligible: violations.is_empty(),
            violations,
            details,
        }
    }
}

/// Hard rules the evaluator enforces. A failed rule can never be reversed
/// by a human reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    MinCreditScore,
    MaxActiveLoans,
    MinAnnualIncome,
    MaxDti,
    MaxLoanToIncomeRatio,
    MinEmploymentScore,
    BlockedRiskFlags,
}

/// Observed or required value attached to a violation, so callers can
/// reproduce the failing comparison exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyValue {
    Count(u32),
    Number(f64),
    /// `None` serializes to null: the ratio was undefined, not zero.
    Ratio(Option<f64>),
    Flags(Vec<String>),
}

/// One failed hard rule with the observed and threshold values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: RuleKind,
    pub message: String,
    pub current_value: PolicyValue,
    pub required_value: PolicyValue,
}

/// Full verdict for one evaluation pass. Constructed fresh on every call,
/// never cached or mutated after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub violations: Vec<RuleViolation>,
    pub details: EligibilitySnapshot,
}
