use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Injectable lending policy: the hard-rule thresholds plus the soft review
/// dials the orchestrator applies after hard rules pass. Serialized verbatim
/// on the policy endpoint so auditors can compare the advertised constants
/// against enforced behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingPolicy {
    pub min_credit_score: u16,
    pub max_active_loans: u32,
    pub min_annual_income: f64,
    pub max_dti: f64,
    pub max_loan_to_income_ratio: f64,
    pub min_employment_score: f64,
    pub blocked_risk_flags: BTreeSet<String>,
    pub review_credit_score: u16,
    pub review_amount_to_income: f64,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            min_credit_score: 500,
            max_active_loans: 5,
            min_annual_income: 12_000.0,
            max_dti: 0.50,
            max_loan_to_income_ratio: 0.50,
            min_employment_score: 0.3,
            blocked_risk_flags: ["bankruptcy", "fraud", "collections"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            review_credit_score: 650,
            review_amount_to_income: 0.30,
        }
    }
}
