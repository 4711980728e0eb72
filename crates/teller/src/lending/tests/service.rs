use std::sync::Arc;

use super::common::*;
use crate::lending::domain::{CustomerId, DecisionSource, LoanPurpose, LoanStatus};
use crate::lending::repository::{LoanStore, StoreError};
use crate::lending::service::{
    ApplicationOutcome, LoanApplication, LoanOriginationService, OriginationError,
};

fn application(customer_id: &str, amount: f64) -> LoanApplication {
    LoanApplication {
        customer_id: CustomerId(customer_id.to_string()),
        amount,
        purpose: LoanPurpose::Personal,
        force_approve: false,
        force_reject: false,
    }
}

#[test]
fn apply_books_a_loan_with_frozen_snapshot() {
    let (service, loan_store, _) = build_service(vec![customer("CUST-1", 720, 60_000.0)]);

    let outcome = service
        .apply(application("CUST-1", 15_000.0))
        .expect("application succeeds");

    let loan = match outcome {
        ApplicationOutcome::Booked(loan) => loan,
        other => panic!("expected booked loan, got {other:?}"),
    };

    assert!(loan.loan_id.0.starts_with("LN-"));
    assert_eq!(loan.status, LoanStatus::Active);
    assert_eq!(loan.decision_source, DecisionSource::SystemAuto);
    assert_eq!(loan.remaining_balance, loan.amount);
    assert_eq!(loan.eligibility_details.credit_score, 720);
    assert_eq!(loan.eligibility_details.loan_to_income_ratio, Some(0.25));
    assert_eq!(loan_store.all().len(), 1);
}

#[test]
fn hard_rejection_is_returned_without_persisting_anything() {
    let (service, loan_store, notices) = build_service(vec![customer("CUST-2", 450, 50_000.0)]);

    let outcome = service
        .apply(application("CUST-2", 5_000.0))
        .expect("refusal is a normal outcome");

    match outcome {
        ApplicationOutcome::Refused(rejection) => {
            assert!(!rejection.violations.is_empty());
            assert!(!rejection.force_approve_allowed());
        }
        other => panic!("expected refusal, got {other:?}"),
    }
    assert!(loan_store.all().is_empty());
    assert!(notices.events().is_empty());
}

#[test]
fn invalid_amounts_are_rejected_before_evaluation() {
    let (service, loan_store, _) = build_service(vec![customer("CUST-3", 720, 60_000.0)]);

    for amount in [0.0, -100.0, f64::NAN, f64::INFINITY] {
        match service.apply(application("CUST-3", amount)) {
            Err(OriginationError::InvalidAmount { .. }) => {}
            other => panic!("expected invalid amount error, got {other:?}"),
        }
    }
    assert!(loan_store.all().is_empty());
}

#[test]
fn unknown_customer_surfaces_not_found() {
    let (service, loan_store, _) = build_service(Vec::new());

    match service.apply(application("CUST-GHOST", 5_000.0)) {
        Err(OriginationError::CustomerNotFound(id)) => assert_eq!(id.0, "CUST-GHOST"),
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(loan_store.all().is_empty());

    match service.check_eligibility(&CustomerId("CUST-GHOST".to_string()), 5_000.0) {
        Err(OriginationError::CustomerNotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn store_failure_propagates_and_the_decision_is_not_made() {
    let customers = Arc::new(MemoryCustomerStore::with(vec![customer(
        "CUST-4", 720, 60_000.0,
    )]));
    let notices = Arc::new(MemoryNotices::default());
    let service = LoanOriginationService::new(
        customers,
        Arc::new(MemoryAccountStore::default()),
        Arc::new(UnavailableLoanStore),
        notices.clone(),
        policy(),
    );

    match service.apply(application("CUST-4", 15_000.0)) {
        Err(OriginationError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected store failure, got {other:?}"),
    }
    assert!(notices.events().is_empty());
}

#[test]
fn eligibility_check_is_read_only_and_idempotent() {
    let (service, loan_store, _) = build_service(vec![customer("CUST-5", 510, 20_000.0)]);
    let id = CustomerId("CUST-5".to_string());

    let first = service
        .check_eligibility(&id, 9_000.0)
        .expect("check succeeds");
    let second = service
        .check_eligibility(&id, 9_000.0)
        .expect("check succeeds");

    assert_eq!(first, second);
    assert!(loan_store.all().is_empty());
}

#[test]
fn approved_loans_publish_a_notice() {
    let (service, _, notices) = build_service(vec![customer("CUST-6", 720, 60_000.0)]);

    let outcome = service
        .apply(application("CUST-6", 10_000.0))
        .expect("application succeeds");
    let loan = match outcome {
        ApplicationOutcome::Booked(loan) => loan,
        other => panic!("expected booked loan, got {other:?}"),
    };

    let events = notices.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].template, "loan_approved");
    assert_eq!(events[0].loan_id, loan.loan_id);
}

#[test]
fn manual_review_loans_do_not_publish_notices() {
    let (service, loan_store, notices) = build_service(vec![customer("CUST-7", 720, 60_000.0)]);

    service
        .apply(application("CUST-7", 25_000.0))
        .expect("application succeeds");

    assert_eq!(loan_store.all()[0].status, LoanStatus::ManualReview);
    assert!(notices.events().is_empty());
}

#[test]
fn notice_delivery_failure_does_not_unmake_the_decision() {
    let customers = Arc::new(MemoryCustomerStore::with(vec![customer(
        "CUST-8", 720, 60_000.0,
    )]));
    let loan_store = Arc::new(MemoryLoanStore::default());
    let service = LoanOriginationService::new(
        customers,
        Arc::new(MemoryAccountStore::default()),
        loan_store.clone(),
        Arc::new(FailingNotices),
        policy(),
    );

    let outcome = service
        .apply(application("CUST-8", 10_000.0))
        .expect("application succeeds despite smtp outage");

    assert!(matches!(outcome, ApplicationOutcome::Booked(_)));
    assert_eq!(loan_store.all().len(), 1);
}

#[test]
fn dti_report_counts_only_active_loans() {
    let (service, loan_store, _) = build_service(vec![customer("CUST-9", 720, 60_000.0)]);
    let id = CustomerId("CUST-9".to_string());

    let mut denied = active_loan("CUST-9", 50_000.0);
    denied.status = LoanStatus::Denied;
    denied.loan_id.0.push_str("-denied");
    loan_store.insert(denied).expect("seed denied loan");
    loan_store
        .insert(active_loan("CUST-9", 12_000.0))
        .expect("seed active loan");

    let view = service.dti_report(&id).expect("dti view");

    assert_eq!(view.active_loans_count, 1);
    assert_eq!(view.existing_monthly_debt, 1_000.0);
    assert_eq!(view.dti, Some(0.2));
}

#[test]
fn dti_report_flags_invalid_income() {
    let (service, _, _) = build_service(vec![customer("CUST-10", 720, 0.0)]);

    let view = service
        .dti_report(&CustomerId("CUST-10".to_string()))
        .expect("dti view");

    assert_eq!(view.dti, None);
    assert_eq!(view.risk_level.label(), "invalid_income");
}

#[test]
fn employment_report_surfaces_score_and_label() {
    let (service, _, _) = build_service(vec![customer("CUST-11", 720, 60_000.0)]);

    let view = service
        .employment_report(&CustomerId("CUST-11".to_string()))
        .expect("employment view");

    assert_eq!(view.employment_score, 1.0);
    assert_eq!(view.stability_level.label(), "excellent");
}

#[test]
fn loans_listing_requires_a_known_customer() {
    let (service, loan_store, _) = build_service(vec![customer("CUST-12", 720, 60_000.0)]);
    loan_store
        .insert(active_loan("CUST-12", 4_000.0))
        .expect("seed loan");

    let loans = service
        .loans_for(&CustomerId("CUST-12".to_string()))
        .expect("loans listed");
    assert_eq!(loans.len(), 1);

    match service.loans_for(&CustomerId("CUST-NOPE".to_string())) {
        Err(OriginationError::CustomerNotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn account_lookup_lists_only_the_customers_accounts() {
    let (service, _, _) = build_service_with_accounts(
        vec![
            customer("CUST-13", 720, 60_000.0),
            customer("CUST-14", 700, 40_000.0),
        ],
        vec![
            account("ACC-1", "CUST-13", 2_500.0),
            account("ACC-2", "CUST-13", 11_000.0),
            account("ACC-3", "CUST-14", 800.0),
        ],
    );

    let accounts = service
        .accounts_for(&CustomerId("CUST-13".to_string()))
        .expect("accounts listed");

    assert_eq!(accounts.len(), 2);
    assert!(accounts
        .iter()
        .all(|account| account.customer_id.0 == "CUST-13"));
}

#[test]
fn account_lookup_distinguishes_unknown_customer_from_no_accounts() {
    let (service, _, _) = build_service(vec![customer("CUST-15", 720, 60_000.0)]);

    match service.accounts_for(&CustomerId("CUST-GHOST".to_string())) {
        Err(OriginationError::CustomerNotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }

    match service.accounts_for(&CustomerId("CUST-15".to_string())) {
        Err(OriginationError::AccountsNotFound(id)) => assert_eq!(id.0, "CUST-15"),
        other => panic!("expected empty-account error, got {other:?}"),
    }
}

#[test]
fn customer_summaries_list_id_and_name() {
    let (service, _, _) = build_service(vec![
        customer("CUST-B1", 700, 40_000.0),
        customer("CUST-A1", 700, 40_000.0),
    ]);

    let summaries = service.customers().expect("summaries listed");
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].customer_id.0, "CUST-A1");
}
