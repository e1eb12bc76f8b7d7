//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookFilter},
        page::{Page, PageRequest},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book to the catalog. ISBNs are unique.
    pub async fn save(&self, book: Book) -> AppResult<Book> {
        if self.repository.books.exists_by_isbn(book.isbn).await? {
            return Err(AppError::BusinessRule("Isbn already registered".to_string()));
        }
        let saved = self.repository.books.create(&book).await?;
        tracing::debug!(id = ?saved.id, isbn = saved.isbn, "Book saved");
        Ok(saved)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        self.repository.books.find_by_id(id).await
    }

    pub async fn find_by_isbn(&self, isbn: i64) -> AppResult<Option<Book>> {
        self.repository.books.find_by_isbn(isbn).await
    }

    pub async fn update(&self, book: Book) -> AppResult<Book> {
        let id = book.id.ok_or_else(missing_id)?;
        self.repository.books.update(id, &book).await
    }

    pub async fn delete(&self, book: &Book) -> AppResult<()> {
        let id = book.id.ok_or_else(missing_id)?;
        self.repository.books.delete(id).await
    }

    /// Search the catalog: title and author match case-insensitive substrings,
    /// ISBN matches exactly, absent criteria are ignored.
    pub async fn find(&self, filter: &BookFilter, page: PageRequest) -> AppResult<Page<Book>> {
        self.repository.books.search(filter, page).await
    }
}

fn missing_id() -> AppError {
    AppError::BadRequest("Book id must not be null".to_string())
}
