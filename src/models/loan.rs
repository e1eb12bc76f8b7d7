//! Loan (checkout) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{book::Book, NOT_BLANK};

/// Loan of a book to a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    /// Generated identifier, `None` until the loan is persisted
    pub id: Option<i64>,
    pub customer: String,
    pub book: Book,
    pub loan_date: NaiveDate,
    /// `None` or `Some(false)` while the book is still out
    pub returned: Option<bool>,
}

impl Loan {
    /// A loan is outstanding until it is flagged as returned
    pub fn is_outstanding(&self) -> bool {
        !self.returned.unwrap_or(false)
    }
}

/// Loan joined with its book, as read from the database
#[derive(Debug, Clone, FromRow)]
pub struct LoanRow {
    pub id: i64,
    pub customer: String,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
    pub book_id: i64,
    pub book_title: String,
    pub book_author: String,
    pub book_isbn: i64,
}

impl From<LoanRow> for Loan {
    fn from(row: LoanRow) -> Self {
        Self {
            id: Some(row.id),
            customer: row.customer,
            book: Book {
                id: Some(row.book_id),
                title: row.book_title,
                author: row.book_author,
                isbn: row.book_isbn,
            },
            loan_date: row.loan_date,
            returned: row.returned,
        }
    }
}

/// Create loan request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    /// ISBN of the book to check out
    #[validate(required(message = "must not be null"))]
    pub isbn: Option<i64>,
    /// Customer borrowing the book
    #[validate(
        required(message = "must not be null"),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub customer: Option<String>,
}

/// Return (or un-return) request for a loan
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ReturnLoan {
    #[validate(required(message = "must not be null"))]
    pub returned: Option<bool>,
}

/// Loan as exposed by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDto {
    pub id: Option<i64>,
    /// ISBN of the loaned book
    pub isbn: i64,
    pub customer: String,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
    pub book: Book,
}

impl From<Loan> for LoanDto {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id,
            isbn: loan.book.isbn,
            customer: loan.customer,
            loan_date: loan.loan_date,
            returned: loan.returned,
            book: loan.book,
        }
    }
}

/// Loan search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    /// ISBN of the loaned book
    pub isbn: Option<i64>,
    /// Exact customer name
    pub customer: Option<String>,
    /// Zero-based page number (default: 0)
    pub page: Option<i64>,
    /// Page size
    pub size: Option<i64>,
}

/// Loan filter: a loan matches when its book ISBN or its customer matches.
/// An empty filter matches every loan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanFilter {
    pub isbn: Option<i64>,
    pub customer: Option<String>,
}

impl From<&LoanQuery> for LoanFilter {
    fn from(query: &LoanQuery) -> Self {
        Self {
            isbn: query.isbn,
            customer: query.customer.clone().filter(|s| !s.is_empty()),
        }
    }
}
