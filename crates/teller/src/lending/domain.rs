use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for customer records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for booked loans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(pub String);

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employment categories recognized by the stability scorer. Anything the
/// store holds outside this list deserializes to `Other` and scores 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Permanent,
    Contract,
    // Legacy records spell this with a hyphen.
    #[serde(alias = "part-time")]
    PartTime,
    SelfEmployed,
    #[serde(other)]
    Other,
}

/// Customer profile with the underwriting attributes the engine consumes.
///
/// Income and credit score are always present; the employment fields are
/// genuinely optional (absent, not zero) and `risk_flags` normalizes to an
/// empty set at the serde boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub annual_income: f64,
    pub credit_score: u16,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub years_with_employer: Option<f64>,
    #[serde(default)]
    pub business_years: Option<f64>,
    #[serde(default)]
    pub risk_flags: BTreeSet<String>,
}

/// Identifier wrapper for bank accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product categories for deposit accounts. Unknown store values
/// deserialize to `Other` rather than failing the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Checking,
    Savings,
    #[serde(other)]
    Other,
}

/// Bank account record served by the account lookup. Balances are reported
/// as stored; the engine never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub customer_id: CustomerId,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub balance: f64,
    pub currency: String,
}

/// Declared purpose of a requested loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanPurpose {
    Cars,
    House,
    Personal,
    Business,
    Other,
}

/// Terminal status assigned by the decision orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Denied,
    ManualReview,
    // Older records persisted "approved" for the same state.
    #[serde(alias = "approved")]
    Active,
}

impl LoanStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LoanStatus::Denied => "denied",
            LoanStatus::ManualReview => "manual_review",
            LoanStatus::Active => "active",
        }
    }

    /// Only active loans count toward exposure limits and DTI aggregates.
    pub const fn is_active(self) -> bool {
        matches!(self, LoanStatus::Active)
    }
}

/// Provenance of a loan decision, kept for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    SystemAuto,
    UserOverride,
}

impl DecisionSource {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionSource::SystemAuto => "system_auto",
            DecisionSource::UserOverride => "user_override",
        }
    }
}

/// Metric snapshot frozen at decision time and stored on the loan record.
/// Ratios are `None` when undefined (income <= 0), never coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilitySnapshot {
    pub credit_score: u16,
    pub active_loan_count: u32,
    pub annual_income: f64,
    pub current_dti: Option<f64>,
    pub projected_dti: Option<f64>,
    pub loan_to_income_ratio: Option<f64>,
    pub employment_score: f64,
    pub risk_flags: Vec<String>,
}

/// Immutable decision record. Only `remaining_balance` amortizes after
/// creation, and that happens outside this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub amount: f64,
    pub purpose: LoanPurpose,
    pub status: LoanStatus,
    pub remaining_balance: f64,
    pub decision_source: DecisionSource,
    pub decision_reason: String,
    pub eligibility_details: EligibilitySnapshot,
    pub created_at: DateTime<Utc>,
}
