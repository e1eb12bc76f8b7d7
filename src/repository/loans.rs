//! Loans repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{Loan, LoanFilter, LoanRow},
        page::{Page, PageRequest},
    },
};

const LOAN_COLUMNS: &str = r#"
    l.id, l.customer, l.loan_date, l.returned,
    b.id AS book_id, b.title AS book_title, b.author AS book_author, b.isbn AS book_isbn
"#;

/// Persistence operations on loans
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoansRepository: Send + Sync {
    /// Whether the book has a loan that is not flagged as returned
    async fn exists_outstanding_for_book(&self, book_id: i64) -> AppResult<bool>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Loan>>;

    /// Insert a new loan and return it with its generated id
    async fn create(&self, loan: &Loan) -> AppResult<Loan>;

    /// Persist the `returned` flag of a stored loan
    async fn update(&self, id: i64, loan: &Loan) -> AppResult<Loan>;

    async fn search(&self, filter: &LoanFilter, page: PageRequest) -> AppResult<Page<Loan>>;
}

#[derive(Clone)]
pub struct PgLoansRepository {
    pool: Pool<Postgres>,
}

impl PgLoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> AppResult<Option<Loan>> {
        let query = format!(
            "SELECT {} FROM loans l JOIN books b ON b.id = l.book_id WHERE l.id = $1",
            LOAN_COLUMNS
        );
        let row = sqlx::query_as::<_, LoanRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Loan::from))
    }
}

#[async_trait]
impl LoansRepository for PgLoansRepository {
    async fn exists_outstanding_for_book(&self, book_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM loans
                WHERE book_id = $1 AND (returned IS NULL OR returned = FALSE)
            )
            "#,
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Loan>> {
        self.fetch(id).await
    }

    async fn create(&self, loan: &Loan) -> AppResult<Loan> {
        let book_id = loan
            .book
            .id
            .ok_or_else(|| AppError::BadRequest("Book id must not be null".to_string()))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO loans (customer, book_id, loan_date, returned)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&loan.customer)
        .bind(book_id)
        .bind(loan.loan_date)
        .bind(loan.returned)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                AppError::BusinessRule("Book not found".to_string())
            }
            e => AppError::Database(e),
        })?;

        Ok(Loan {
            id: Some(id),
            ..loan.clone()
        })
    }

    async fn update(&self, id: i64, loan: &Loan) -> AppResult<Loan> {
        let result = sqlx::query("UPDATE loans SET returned = $1 WHERE id = $2")
            .bind(loan.returned)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Loan not found".to_string()));
        }

        self.fetch(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Loan not found".to_string()))
    }

    async fn search(&self, filter: &LoanFilter, page: PageRequest) -> AppResult<Page<Loan>> {
        let condition = r#"
            ($1::bigint IS NULL AND $2::text IS NULL)
            OR b.isbn = $1
            OR l.customer = $2
        "#;

        let query = format!(
            r#"
            SELECT {}
            FROM loans l
            JOIN books b ON b.id = l.book_id
            WHERE {}
            ORDER BY l.id
            LIMIT $3 OFFSET $4
            "#,
            LOAN_COLUMNS, condition
        );

        let rows = sqlx::query_as::<_, LoanRow>(&query)
            .bind(filter.isbn)
            .bind(&filter.customer)
            .bind(page.size)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_query = format!(
            "SELECT COUNT(*) FROM loans l JOIN books b ON b.id = l.book_id WHERE {}",
            condition
        );

        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.isbn)
            .bind(&filter.customer)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(rows.into_iter().map(Loan::from).collect(), page, total))
    }
}
