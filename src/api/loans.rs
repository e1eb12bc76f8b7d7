//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{
        loan::{CreateLoan, Loan, LoanDto, LoanFilter, LoanQuery, ReturnLoan},
        page::{LoanPage, Page},
    },
    AppState,
};

use super::{QueryParams, ValidatedJson};

/// Loan creation response
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    /// Loan ID
    pub id: i64,
    pub loan_date: NaiveDate,
    /// Status message
    pub message: String,
}

/// Check a book out to a customer
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 400, description = "Invalid input, unknown ISBN or book already loaned", body = ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    let isbn = request.isbn.unwrap_or_default();
    let customer = request.customer.unwrap_or_default();
    tracing::info!(isbn, customer = %customer, "Request to loan book");

    let book = state
        .services
        .books
        .find_by_isbn(isbn)
        .await?
        .ok_or_else(|| AppError::BusinessRule("Book not found for passed isbn".to_string()))?;

    let loan = Loan {
        id: None,
        customer,
        book,
        loan_date: Utc::now().date_naive(),
        returned: None,
    };

    let saved = state.services.loans.save(loan).await?;
    let id = saved
        .id
        .ok_or_else(|| AppError::Internal("Saved loan has no id".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            id,
            loan_date: saved.loan_date,
            message: "Book loaned successfully".to_string(),
        }),
    ))
}

/// Get loan details by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i64, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanDto),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    )
)]
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LoanDto>> {
    let loan = find_existing(&state, id).await?;
    Ok(Json(loan.into()))
}

/// Flag a loan as returned (or not)
#[utoipa::path(
    patch,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i64, Path, description = "Loan ID")
    ),
    request_body = ReturnLoan,
    responses(
        (status = 200, description = "Loan updated", body = LoanDto),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<ReturnLoan>,
) -> AppResult<Json<LoanDto>> {
    tracing::info!(id, returned = ?request.returned, "Request to return book");

    let mut loan = find_existing(&state, id).await?;
    loan.returned = request.returned;

    let updated = state.services.loans.update(loan).await?;
    Ok(Json(updated.into()))
}

/// Search loans by ISBN or customer with pagination
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(LoanQuery),
    responses(
        (status = 200, description = "Page of matching loans", body = LoanPage),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
pub async fn find_loans(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LoanQuery>,
) -> AppResult<Json<Page<LoanDto>>> {
    let page = state.config.pagination.page_request(query.page, query.size)?;
    let filter = LoanFilter::from(&query);
    tracing::info!(?filter, page = page.page, size = page.size, "Request to find loans");

    let loans = state.services.loans.find(&filter, page).await?;
    Ok(Json(loans.map(LoanDto::from)))
}

async fn find_existing(state: &AppState, id: i64) -> AppResult<Loan> {
    state
        .services
        .loans
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Loan not found".to_string()))
}
