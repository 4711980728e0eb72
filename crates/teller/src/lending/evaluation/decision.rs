use serde::{Deserialize, Serialize};

use super::super::domain::{Customer, DecisionSource, EligibilitySnapshot, Loan, LoanStatus};
use super::{EligibilityEvaluator, LendingPolicy, RuleViolation};

pub const REASON_MANUAL_REJECTION: &str = "manual rejection by advisor";
pub const REASON_MANUAL_APPROVAL: &str = "manual approval by advisor (eligibility verified)";
pub const REASON_CREDIT_REVIEW: &str = "credit_score_below_650_needs_review";
pub const REASON_AMOUNT_REVIEW: &str = "amount_exceeds_30pct_income";
pub const REASON_MEETS_CRITERIA: &str = "meets_all_criteria";

/// Advisory flags captured from a human reviewer. When both are set, the
/// rejection wins; ambiguous input resolves conservatively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerOverrides {
    #[serde(default)]
    pub force_approve: bool,
    #[serde(default)]
    pub force_reject: bool,
}

/// Hard-rule failure payload. This outcome is final: no override flag can
/// reach past it, which `force_approve_allowed` states explicitly for
/// callers rendering the rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardRejection {
    pub violations: Vec<RuleViolation>,
    pub details: EligibilitySnapshot,
}

impl HardRejection {
    pub const fn force_approve_allowed(&self) -> bool {
        false
    }
}

/// Terms for a loan that cleared the hard rules, carrying the provenance
/// recorded on the booked record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecidedTerms {
    pub status: LoanStatus,
    pub decision_source: DecisionSource,
    pub decision_reason: String,
    pub details: EligibilitySnapshot,
}

/// Outcome of a full decision pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoanDecision {
    HardRejection(HardRejection),
    Decided(DecidedTerms),
}

/// Stateless orchestrator combining the hard-rule verdict with soft review
/// heuristics and advisor overrides.
pub struct DecisionEngine {
    evaluator: EligibilityEvaluator,
}

impl DecisionEngine {
    pub fn new(policy: LendingPolicy) -> Self {
        Self {
            evaluator: EligibilityEvaluator::new(policy),
        }
    }

    pub fn policy(&self) -> &LendingPolicy {
        self.evaluator.policy()
    }

    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    /// Decide a proposed loan. Overrides only apply after hard rules pass.
    pub fn decide(
        &self,
        customer: &Customer,
        proposed_amount: f64,
        active_loans: &[Loan],
        overrides: ReviewerOverrides,
    ) -> LoanDecision {
        let report = self.evaluator.evaluate(customer, proposed_amount, active_loans);

        if !report.eligible {
            return LoanDecision::HardRejection(HardRejection {
                violations: report.violations,
                details: report.details,
            });
        }

        let policy = self.evaluator.policy();
        let (status, decision_source, decision_reason) = if overrides.force_reject {
            (
                LoanStatus::Denied,
                DecisionSource::UserOverride,
                REASON_MANUAL_REJECTION,
            )
        } else if overrides.force_approve {
            (
                LoanStatus::Active,
                DecisionSource::UserOverride,
                REASON_MANUAL_APPROVAL,
            )
        } else if customer.credit_score < policy.review_credit_score {
            (
                LoanStatus::ManualReview,
                DecisionSource::SystemAuto,
                REASON_CREDIT_REVIEW,
            )
        } else if proposed_amount > customer.annual_income * policy.review_amount_to_income {
            (
                LoanStatus::ManualReview,
                DecisionSource::SystemAuto,
                REASON_AMOUNT_REVIEW,
            )
        } else {
            (
                LoanStatus::Active,
                DecisionSource::SystemAuto,
                REASON_MEETS_CRITERIA,
            )
        };

        LoanDecision::Decided(DecidedTerms {
            status,
            decision_source,
            decision_reason: decision_reason.to_string(),
            details: report.details,
        })
    }
}
