//! Loan management endpoints

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, LoanDetails, LoanQuery, ReturnLoan},
};

use super::AppJson;

/// Loan response with a status message
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    /// Status message
    pub message: String,
    /// Loan details
    pub loan: LoanDetails,
}

/// List loans, optionally only active ones
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(LoanQuery),
    responses(
        (status = 200, description = "Loans in registration order", body = Vec<LoanDetails>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = if query.active.unwrap_or(false) {
        state.services.loans.list_active().await?
    } else {
        state.services.loans.list_loans().await?
    };
    Ok(Json(loans))
}

/// Get a loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<String>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get_loan(&loan_id).await?;
    Ok(Json(loan))
}

/// Get active loans of a user
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's active loans", body = Vec<LoanDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.get_user_loans(&user_id).await?;
    Ok(Json(loans))
}

/// Get active loans of a book
#[utoipa::path(
    get,
    path = "/books/{isbn}/loans",
    tag = "loans",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Book's active loans", body = Vec<LoanDetails>)
    )
)]
pub async fn get_book_loans(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.get_book_loans(&isbn).await?;
    Ok(Json(loans))
}

/// Lend a book to a user
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Book or user not found"),
        (status = 409, description = "Book is not available")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    let loan = state.services.loans.create_loan(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            message: format!("Loan registered. ID: {}", loan.loan.id),
            loan,
        }),
    ))
}

/// Register the return of a borrowed book.
///
/// The body is optional; without it the return is dated today.
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID")
    ),
    request_body = ReturnLoan,
    responses(
        (status = 200, description = "Book returned", body = LoanResponse),
        (status = 404, description = "Loan not found or already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<String>,
    body: Bytes,
) -> AppResult<Json<LoanResponse>> {
    let request: ReturnLoan = if body.iter().all(u8::is_ascii_whitespace) {
        ReturnLoan::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?
    };

    let loan = state
        .services
        .loans
        .return_loan(&loan_id, request.return_date)
        .await?;

    Ok(Json(LoanResponse {
        message: "Return registered".to_string(),
        loan,
    }))
}
