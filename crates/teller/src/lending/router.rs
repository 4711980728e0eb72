use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::CustomerId;
use super::repository::{AccountStore, CustomerStore, LoanStore, NotificationSink};
use super::service::{
    ApplicationOutcome, LoanApplication, LoanOriginationService, OriginationError,
};

/// Router builder exposing the engine's HTTP endpoints.
pub fn lending_router<C, A, L, N>(service: Arc<LoanOriginationService<C, A, L, N>>) -> Router
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route("/api/v1/loans/apply", post(apply_handler::<C, A, L, N>))
        .route(
            "/api/v1/loans/eligibility",
            post(eligibility_handler::<C, A, L, N>),
        )
        .route("/api/v1/customers", get(list_customers_handler::<C, A, L, N>))
        .route(
            "/api/v1/customers/:customer_id",
            get(customer_handler::<C, A, L, N>),
        )
        .route(
            "/api/v1/customers/:customer_id/loans",
            get(customer_loans_handler::<C, A, L, N>),
        )
        .route(
            "/api/v1/customers/:customer_id/accounts",
            get(customer_accounts_handler::<C, A, L, N>),
        )
        .route(
            "/api/v1/customers/:customer_id/dti",
            get(dti_handler::<C, A, L, N>),
        )
        .route(
            "/api/v1/customers/:customer_id/employment-score",
            get(employment_handler::<C, A, L, N>),
        )
        .route("/api/v1/policy", get(policy_handler::<C, A, L, N>))
        .with_state(service)
}

fn error_response(error: OriginationError) -> Response {
    let status = match &error {
        OriginationError::CustomerNotFound(_) | OriginationError::AccountsNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        OriginationError::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
        OriginationError::Store(_) | OriginationError::Notification(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn apply_handler<C, A, L, N>(
    State(service): State<Arc<LoanOriginationService<C, A, L, N>>>,
    axum::Json(application): axum::Json<LoanApplication>,
) -> Response
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    match service.apply(application) {
        Ok(ApplicationOutcome::Booked(loan)) => {
            (StatusCode::CREATED, axum::Json(loan)).into_response()
        }
        Ok(ApplicationOutcome::Refused(rejection)) => {
            let payload = json!({
                "eligible": false,
                "violations": rejection.violations,
                "details": rejection.details,
                "force_approve_allowed": rejection.force_approve_allowed(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EligibilityRequest {
    pub(crate) customer_id: CustomerId,
    pub(crate) proposed_amount: f64,
}

pub(crate) async fn eligibility_handler<C, A, L, N>(
    State(service): State<Arc<LoanOriginationService<C, A, L, N>>>,
    axum::Json(request): axum::Json<EligibilityRequest>,
) -> Response
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    match service.check_eligibility(&request.customer_id, request.proposed_amount) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_customers_handler<C, A, L, N>(
    State(service): State<Arc<LoanOriginationService<C, A, L, N>>>,
) -> Response
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    match service.customers() {
        Ok(summaries) => (StatusCode::OK, axum::Json(summaries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn customer_handler<C, A, L, N>(
    State(service): State<Arc<LoanOriginationService<C, A, L, N>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    match service.customer(&CustomerId(customer_id)) {
        Ok(customer) => (StatusCode::OK, axum::Json(customer)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn customer_loans_handler<C, A, L, N>(
    State(service): State<Arc<LoanOriginationService<C, A, L, N>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    match service.loans_for(&CustomerId(customer_id)) {
        Ok(loans) => (StatusCode::OK, axum::Json(loans)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn customer_accounts_handler<C, A, L, N>(
    State(service): State<Arc<LoanOriginationService<C, A, L, N>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    match service.accounts_for(&CustomerId(customer_id)) {
        Ok(accounts) => (StatusCode::OK, axum::Json(accounts)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dti_handler<C, A, L, N>(
    State(service): State<Arc<LoanOriginationService<C, A, L, N>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    match service.dti_report(&CustomerId(customer_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn employment_handler<C, A, L, N>(
    State(service): State<Arc<LoanOriginationService<C, A, L, N>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    match service.employment_report(&CustomerId(customer_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn policy_handler<C, A, L, N>(
    State(service): State<Arc<LoanOriginationService<C, A, L, N>>>,
) -> Response
where
    C: CustomerStore + 'static,
    A: AccountStore + 'static,
    L: LoanStore + 'static,
    N: NotificationSink + 'static,
{
    (StatusCode::OK, axum::Json(service.policy().clone())).into_response()
}
