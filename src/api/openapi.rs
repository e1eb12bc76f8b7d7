//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Book catalog and loan management REST API"
    ),
    servers(
        (url = "/api", description = "Library API")
    ),
    paths(
        // Health
        health::health_check,
        // Books
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        books::find_books,
        // Loans
        loans::create_loan,
        loans::get_loan,
        loans::return_book,
        loans::find_loans,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::page::BookPage,
            // Loans
            crate::models::loan::CreateLoan,
            crate::models::loan::ReturnLoan,
            crate::models::loan::LoanDto,
            crate::models::page::LoanPage,
            loans::LoanResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "loans", description = "Loan management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
