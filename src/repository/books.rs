//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookFilter},
        page::{Page, PageRequest},
    },
};

/// Persistence operations on the book catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksRepository: Send + Sync {
    async fn exists_by_isbn(&self, isbn: i64) -> AppResult<bool>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    async fn find_by_isbn(&self, isbn: i64) -> AppResult<Option<Book>>;

    /// Insert a new book and return it with its generated id
    async fn create(&self, book: &Book) -> AppResult<Book>;

    /// Overwrite title and author of a stored book
    async fn update(&self, id: i64, book: &Book) -> AppResult<Book>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn search(&self, filter: &BookFilter, page: PageRequest) -> AppResult<Page<Book>>;
}

#[derive(Clone)]
pub struct PgBooksRepository {
    pool: Pool<Postgres>,
}

impl PgBooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BooksRepository for PgBooksRepository {
    async fn exists_by_isbn(&self, isbn: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title, author, isbn FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn find_by_isbn(&self, isbn: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title, author, isbn FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn create(&self, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.isbn)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // Lost the race against a concurrent insert of the same ISBN
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::BusinessRule("Isbn already registered".to_string())
            }
            e => AppError::Database(e),
        })
    }

    async fn update(&self, id: i64, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $1, author = $2
            WHERE id = $3
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::BusinessRule("Book has loans and cannot be deleted".to_string())
                }
                e => AppError::Database(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    async fn search(&self, filter: &BookFilter, page: PageRequest) -> AppResult<Page<Book>> {
        let title = filter.title.as_deref().map(contains_pattern);
        let author = filter.author.as_deref().map(contains_pattern);

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, isbn
            FROM books
            WHERE ($1::text IS NULL OR title ILIKE $1)
              AND ($2::text IS NULL OR author ILIKE $2)
              AND ($3::bigint IS NULL OR isbn = $3)
            ORDER BY id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&title)
        .bind(&author)
        .bind(filter.isbn)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM books
            WHERE ($1::text IS NULL OR title ILIKE $1)
              AND ($2::text IS NULL OR author ILIKE $2)
              AND ($3::bigint IS NULL OR isbn = $3)
            "#,
        )
        .bind(&title)
        .bind(&author)
        .bind(filter.isbn)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(books, page, total))
    }
}

/// `LIKE` pattern matching `value` literally anywhere in the column
fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
