//! Pagination types shared by the search endpoints

use serde::Serialize;
use utoipa::ToSchema;

use super::{book::Book, loan::LoanDto};

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    /// Number of rows to skip
    pub fn offset(&self) -> i64 {
        self.page * self.size
    }
}

/// One page of results together with the totals of the whole result set
#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(BookPage = Page<Book>, LoanPage = Page<LoanDto>)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Records on this page
    pub content: Vec<T>,
    /// Number of records matching the query across all pages
    pub total_elements: i64,
    pub total_pages: i64,
    /// Zero-based page number
    pub page: i64,
    /// Page size
    pub size: i64,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: i64) -> Self {
        let total_pages = if request.size > 0 {
            (total_elements + request.size - 1) / request.size
        } else {
            0
        };

        Self {
            content,
            total_elements,
            total_pages,
            page: request.page,
            size: request.size,
        }
    }

    /// Convert the records of this page, keeping the paging metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        U: for<'a> ToSchema<'a>,
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            page: self.page,
            size: self.size,
        }
    }
}
