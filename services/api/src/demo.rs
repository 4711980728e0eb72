use crate::infra::{
    default_lending_policy, seed_accounts, seed_customers, InMemoryAccountStore,
    InMemoryCustomerStore, InMemoryLoanStore, LoggingNotificationSink,
};
use clap::Args;
use std::sync::Arc;
use teller::error::AppError;
use teller::lending::{
    ApplicationOutcome, LoanApplication, LoanOriginationService, LoanPurpose, OriginationError,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Requested amount for each demo application
    #[arg(long, default_value_t = 15_000.0)]
    pub(crate) amount: f64,
    /// Print the serialized lending policy before the walkthrough
    #[arg(long)]
    pub(crate) show_policy: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let customers = Arc::new(InMemoryCustomerStore::with_customers(seed_customers()));
    let accounts = Arc::new(InMemoryAccountStore::with_accounts(seed_accounts()));
    let loans = Arc::new(InMemoryLoanStore::default());
    let notices = Arc::new(LoggingNotificationSink::default());
    let service = LoanOriginationService::new(
        customers,
        accounts,
        loans,
        notices.clone(),
        default_lending_policy(),
    );

    println!("Loan origination demo");

    if args.show_policy {
        match serde_json::to_string_pretty(service.policy()) {
            Ok(json) => println!("Lending policy:\n{json}"),
            Err(err) => println!("Lending policy unavailable: {err}"),
        }
    }

    let summaries = service.customers().map_err(AppError::from)?;
    for summary in summaries {
        println!("\n{} ({})", summary.name, summary.customer_id);

        match service.accounts_for(&summary.customer_id) {
            Ok(accounts) => {
                for account in accounts {
                    println!(
                        "  Account {}: {:.2} {}",
                        account.account_id, account.balance, account.currency
                    );
                }
            }
            Err(OriginationError::AccountsNotFound(_)) => {
                println!("  No deposit accounts on file");
            }
            Err(err) => println!("  Account lookup unavailable: {err}"),
        }

        let report = match service.check_eligibility(&summary.customer_id, args.amount) {
            Ok(report) => report,
            Err(err) => {
                println!("  Eligibility check unavailable: {err}");
                continue;
            }
        };
        println!(
            "  Eligibility for {:.2}: {}",
            args.amount,
            if report.eligible { "pass" } else { "fail" }
        );
        for violation in &report.violations {
            println!("    - {}", violation.message);
        }

        let outcome = service.apply(LoanApplication {
            customer_id: summary.customer_id.clone(),
            amount: args.amount,
            purpose: LoanPurpose::Personal,
            force_approve: false,
            force_reject: false,
        });
        match outcome {
            Ok(ApplicationOutcome::Booked(loan)) => {
                println!(
                    "  Application {} -> {} ({}, {})",
                    loan.loan_id,
                    loan.status.label(),
                    loan.decision_source.label(),
                    loan.decision_reason
                );
            }
            Ok(ApplicationOutcome::Refused(rejection)) => {
                println!(
                    "  Application refused on {} hard rule(s); advisor override not permitted",
                    rejection.violations.len()
                );
            }
            Err(err @ OriginationError::InvalidAmount { .. }) => {
                println!("  Application rejected: {err}");
            }
            Err(err) => return Err(AppError::from(err)),
        }
    }

    let events = notices.events();
    if events.is_empty() {
        println!("\nNotifications: none dispatched");
    } else {
        println!("\nNotifications:");
        for notice in events {
            println!(
                "  - template={} customer={} loan={}",
                notice.template, notice.customer_id, notice.loan_id
            );
        }
    }

    Ok(())
}
