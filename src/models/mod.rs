//! Data models for the library server

pub mod book;
pub mod loan;
pub mod page;

use once_cell::sync::Lazy;
use regex::Regex;

// Re-export commonly used types
pub use book::Book;
pub use loan::{Loan, LoanDto};
pub use page::{Page, PageRequest};

/// Matches any string containing at least one non-whitespace character
pub(crate) static NOT_BLANK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S").expect("valid not-blank regex"));
