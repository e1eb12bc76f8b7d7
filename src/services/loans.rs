//! Loan management service

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{Loan, LoanFilter},
        page::{Page, PageRequest},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record a new loan. A book can only be out once at a time.
    ///
    /// The outstanding-loan check and the insert are not atomic: two
    /// concurrent checkouts of the same book may both succeed.
    pub async fn save(&self, loan: Loan) -> AppResult<Loan> {
        let book_id = loan
            .book
            .id
            .ok_or_else(|| AppError::BadRequest("Book id must not be null".to_string()))?;

        if self.repository.loans.exists_outstanding_for_book(book_id).await? {
            return Err(AppError::BusinessRule("Book already loaned".to_string()));
        }

        let saved = self.repository.loans.create(&loan).await?;
        tracing::debug!(id = ?saved.id, book_id, customer = %saved.customer, "Loan saved");
        Ok(saved)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Loan>> {
        self.repository.loans.find_by_id(id).await
    }

    /// Persist the `returned` flag of a loan
    pub async fn update(&self, loan: Loan) -> AppResult<Loan> {
        let id = loan
            .id
            .ok_or_else(|| AppError::BadRequest("Loan id must not be null".to_string()))?;
        self.repository.loans.update(id, &loan).await
    }

    /// Loans whose book has the given ISBN or whose customer matches
    pub async fn find(&self, filter: &LoanFilter, page: PageRequest) -> AppResult<Page<Loan>> {
        self.repository.loans.search(filter, page).await
    }
}
