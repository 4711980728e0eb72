use super::super::domain::{Customer, EligibilitySnapshot, Loan};
use super::super::metrics::{debt_to_income, employment_score};
use super::config::LendingPolicy;
use super::{PolicyValue, RuleKind, RuleViolation};

/// Run the fixed hard-rule battery. Every rule is checked so the full
/// violation set comes back in one pass; nothing short-circuits.
pub(crate) fn check_rules(
    customer: &Customer,
    proposed_amount: f64,
    active_loans: &[Loan],
    policy: &LendingPolicy,
) -> (Vec<RuleViolation>, EligibilitySnapshot) {
    let mut violations = Vec::new();

    let active_loan_count = active_loans.len() as u32;
    let current = debt_to_income(customer, active_loans, 0.0);
    let projected = debt_to_income(customer, active_loans, proposed_amount);
    let score = employment_score(customer);

    let loan_to_income_ratio = if customer.annual_income > 0.0 {
        Some(proposed_amount / customer.annual_income)
    } else {
        None
    };

    if customer.credit_score < policy.min_credit_score {
        violations.push(RuleViolation {
            rule: RuleKind::MinCreditScore,
            message: format!(
                "credit score {} is below the required minimum {}",
                customer.credit_score, policy.min_credit_score
            ),
            current_value: PolicyValue::Count(customer.credit_score as u32),
            required_value: PolicyValue::Count(policy.min_credit_score as u32),
        });
    }

    if active_loan_count >= policy.max_active_loans {
        violations.push(RuleViolation {
            rule: RuleKind::MaxActiveLoans,
            message: format!(
                "{} active loan(s) meets or exceeds the limit of {}",
                active_loan_count, policy.max_active_loans
            ),
            current_value: PolicyValue::Count(active_loan_count),
            required_value: PolicyValue::Count(policy.max_active_loans),
        });
    }

    if customer.annual_income < policy.min_annual_income {
        violations.push(RuleViolation {
            rule: RuleKind::MinAnnualIncome,
            message: format!(
                "annual income {:.2} is below the required minimum {:.2}",
                customer.annual_income, policy.min_annual_income
            ),
            current_value: PolicyValue::Number(customer.annual_income),
            required_value: PolicyValue::Number(policy.min_annual_income),
        });
    }

    // An undefined ratio with outstanding projected debt counts as a
    // violation; with no debt at all there is nothing to exceed.
    let dti_violates = match projected.ratio {
        Some(ratio) => ratio > policy.max_dti,
        None => projected.projected_monthly_debt > 0.0,
    };
    if dti_violates {
        let message = match projected.ratio {
            Some(ratio) => format!(
                "projected debt-to-income ratio {:.4} exceeds the maximum {:.2}",
                ratio, policy.max_dti
            ),
            None => format!(
                "monthly income is not positive while projected monthly debt is {:.2}",
                projected.projected_monthly_debt
            ),
        };
        violations.push(RuleViolation {
            rule: RuleKind::MaxDti,
            message,
            current_value: PolicyValue::Ratio(projected.ratio),
            required_value: PolicyValue::Number(policy.max_dti),
        });
    }

    // Skipped entirely when income is not positive; the DTI rule already
    // covers that shape of failure.
    if let Some(ratio) = loan_to_income_ratio {
        if ratio > policy.max_loan_to_income_ratio {
            violations.push(RuleViolation {
                rule: RuleKind::MaxLoanToIncomeRatio,
                message: format!(
                    "requested amount is {:.4} of annual income, above the maximum {:.2}",
                    ratio, policy.max_loan_to_income_ratio
                ),
                current_value: PolicyValue::Ratio(Some(ratio)),
                required_value: PolicyValue::Number(policy.max_loan_to_income_ratio),
            });
        }
    }

    if score < policy.min_employment_score {
        violations.push(RuleViolation {
            rule: RuleKind::MinEmploymentScore,
            message: format!(
                "employment stability score {:.2} is below the required minimum {:.2}",
                score, policy.min_employment_score
            ),
            current_value: PolicyValue::Number(score),
            required_value: PolicyValue::Number(policy.min_employment_score),
        });
    }

    let blocked: Vec<String> = customer
        .risk_flags
        .intersection(&policy.blocked_risk_flags)
        .cloned()
        .collect();
    if !blocked.is_empty() {
        violations.push(RuleViolation {
            rule: RuleKind::BlockedRiskFlags,
            message: format!("customer carries blocked risk flag(s): {}", blocked.join(", ")),
            current_value: PolicyValue::Flags(blocked),
            required_value: PolicyValue::Flags(
                policy.blocked_risk_flags.iter().cloned().collect(),
            ),
        });
    }

    let details = EligibilitySnapshot {
        credit_score: customer.credit_score,
        active_loan_count,
        annual_income: customer.annual_income,
        current_dti: current.ratio,
        projected_dti: projected.ratio,
        loan_to_income_ratio,
        employment_score: score,
        risk_flags: customer.risk_flags.iter().cloned().collect(),
    };

    (violations, details)
}
