//! Book (catalog) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{
        book::{Book, BookFilter, BookQuery, CreateBook, UpdateBook},
        page::{BookPage, Page},
    },
    AppState,
};

use super::{QueryParams, ValidatedJson};

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or ISBN already registered", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = request.into_book();
    tracing::info!(isbn = book.isbn, title = %book.title, "Request to save book");

    let created = state.services.books.save(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    tracing::info!(id, "Request to get book");

    let book = find_existing(&state, id).await?;
    Ok(Json(book))
}

/// Update title and author of a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateBook>,
) -> AppResult<Json<Book>> {
    tracing::info!(id, "Request to update book");

    let book = find_existing(&state, id).await?;
    let updated = state.services.books.update(request.apply_to(book)).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Book has loans", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    tracing::info!(id, "Request to delete book");

    let book = find_existing(&state, id).await?;
    state.services.books.delete(&book).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search books with pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Page of matching books", body = BookPage),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
pub async fn find_books(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<BookQuery>,
) -> AppResult<Json<Page<Book>>> {
    let page = state.config.pagination.page_request(query.page, query.size)?;
    let filter = BookFilter::from(&query);
    tracing::info!(?filter, page = page.page, size = page.size, "Request to find books");

    let books = state.services.books.find(&filter, page).await?;
    Ok(Json(books))
}

async fn find_existing(state: &AppState, id: i64) -> AppResult<Book> {
    state
        .services
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
}
