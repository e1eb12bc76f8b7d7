//! Repository layer for database operations

pub mod books;
pub mod loans;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use books::{BooksRepository, PgBooksRepository};
pub use loans::{LoansRepository, PgLoansRepository};

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BooksRepository>,
    pub loans: Arc<dyn LoansRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(PgBooksRepository::new(pool.clone())),
            loans: Arc::new(PgLoansRepository::new(pool)),
        }
    }

    /// Assemble a repository from already-built stores
    pub fn from_parts(books: Arc<dyn BooksRepository>, loans: Arc<dyn LoansRepository>) -> Self {
        Self { books, loans }
    }
}
