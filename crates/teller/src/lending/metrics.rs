use serde::{Deserialize, Serialize};

use super::domain::{Customer, CustomerId, EmploymentType, Loan};

/// Employment stability score in `[0.0, 1.0]`. Total over every input: an
/// unrecognized or absent employment type scores 0.0, and missing tenure
/// fields take the weaker branch of their category.
///
/// First match wins, in table order.
pub fn employment_score(customer: &Customer) -> f64 {
    match customer.employment_type {
        Some(EmploymentType::Permanent) => match customer.years_with_employer {
            Some(years) if years >= 2.0 => 1.0,
            _ => 0.7,
        },
        Some(EmploymentType::Contract) => 0.5,
        Some(EmploymentType::PartTime) => 0.3,
        Some(EmploymentType::SelfEmployed) => match customer.business_years {
            Some(years) if years >= 3.0 => 0.6,
            _ => 0.4,
        },
        Some(EmploymentType::Other) | None => 0.0,
    }
}

/// Display label for an employment score. Not consumed by decision logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityLevel {
    Excellent,
    Good,
    Medium,
    Low,
    Unstable,
}

impl StabilityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 1.0 {
            StabilityLevel::Excellent
        } else if score >= 0.7 {
            StabilityLevel::Good
        } else if score >= 0.5 {
            StabilityLevel::Medium
        } else if score >= 0.3 {
            StabilityLevel::Low
        } else {
            StabilityLevel::Unstable
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StabilityLevel::Excellent => "excellent",
            StabilityLevel::Good => "good",
            StabilityLevel::Medium => "medium",
            StabilityLevel::Low => "low",
            StabilityLevel::Unstable => "unstable",
        }
    }
}

/// Monthly debt aggregates for a customer, optionally projected with a
/// proposed new loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtiBreakdown {
    pub monthly_income: f64,
    pub existing_monthly_debt: f64,
    pub projected_monthly_debt: f64,
    /// `None` when monthly income is zero or negative; callers must surface
    /// this as invalid income rather than a zero ratio.
    pub ratio: Option<f64>,
}

/// Debt-to-income aggregates over the customer's active loans.
///
/// Each active loan contributes `remaining_balance / 12` per month, a flat
/// twelve-month amortization assumption rather than a real schedule. Pass
/// `proposed_amount = 0.0` for the current-debt view.
pub fn debt_to_income(customer: &Customer, active_loans: &[Loan], proposed_amount: f64) -> DtiBreakdown {
    let monthly_income = customer.annual_income / 12.0;
    let existing_monthly_debt: f64 = active_loans
        .iter()
        .map(|loan| loan.remaining_balance / 12.0)
        .sum();
    let projected_monthly_debt = existing_monthly_debt + proposed_amount / 12.0;

    let ratio = if monthly_income <= 0.0 {
        None
    } else {
        Some(projected_monthly_debt / monthly_income)
    };

    DtiBreakdown {
        monthly_income,
        existing_monthly_debt,
        projected_monthly_debt,
        ratio,
    }
}

/// Coarse risk label for the display DTI endpoint. Separate from the
/// eligibility evaluator's own threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiRiskLevel {
    Good,
    Borderline,
    HighRisk,
    InvalidIncome,
}

impl DtiRiskLevel {
    pub fn from_ratio(ratio: Option<f64>) -> Self {
        match ratio {
            None => DtiRiskLevel::InvalidIncome,
            Some(value) if value <= 0.35 => DtiRiskLevel::Good,
            Some(value) if value <= 0.45 => DtiRiskLevel::Borderline,
            Some(_) => DtiRiskLevel::HighRisk,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DtiRiskLevel::Good => "good",
            DtiRiskLevel::Borderline => "borderline",
            DtiRiskLevel::HighRisk => "high_risk",
            DtiRiskLevel::InvalidIncome => "invalid_income",
        }
    }
}

/// Response shape for the per-customer DTI display endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtiView {
    pub customer_id: CustomerId,
    pub monthly_income: f64,
    pub existing_monthly_debt: f64,
    pub dti: Option<f64>,
    pub risk_level: DtiRiskLevel,
    pub active_loans_count: u32,
}

/// Response shape for the per-customer employment score display endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentView {
    pub customer_id: CustomerId,
    pub employment_type: Option<EmploymentType>,
    pub years_with_employer: Option<f64>,
    pub business_years: Option<f64>,
    pub employment_score: f64,
    pub stability_level: StabilityLevel,
}
