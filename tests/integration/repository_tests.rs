//! PostgreSQL repository tests.
//!
//! Each test gets a fresh database with migrations applied by `#[sqlx::test]`.
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use chrono::NaiveDate;
use sqlx::PgPool;

use library_server::{
    models::{
        book::{Book, BookFilter},
        loan::{Loan, LoanFilter},
        page::PageRequest,
    },
    repository::{BooksRepository, LoansRepository, PgBooksRepository, PgLoansRepository},
    AppError,
};

fn new_book(isbn: i64) -> Book {
    Book {
        id: None,
        title: "Desgraça".to_string(),
        author: "Vitu".to_string(),
        isbn,
    }
}

fn new_loan(book: &Book, customer: &str) -> Loan {
    Loan {
        id: None,
        customer: customer.to_string(),
        book: book.clone(),
        loan_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        returned: None,
    }
}

#[sqlx::test]
#[ignore]
async fn exists_by_isbn_reflects_stored_books(pool: PgPool) {
    let books = PgBooksRepository::new(pool);
    assert!(!books.exists_by_isbn(123).await.unwrap());

    books.create(&new_book(123)).await.unwrap();

    assert!(books.exists_by_isbn(123).await.unwrap());
}

#[sqlx::test]
#[ignore]
async fn create_assigns_id_and_find_returns_fields(pool: PgPool) {
    let books = PgBooksRepository::new(pool);

    let saved = books.create(&new_book(123231)).await.unwrap();
    assert!(saved.id.is_some());

    let found = books.find_by_id(saved.id.unwrap()).await.unwrap();
    assert_eq!(found, Some(saved.clone()));

    let by_isbn = books.find_by_isbn(123231).await.unwrap();
    assert_eq!(by_isbn, Some(saved));

    assert_eq!(books.find_by_id(987654).await.unwrap(), None);
}

#[sqlx::test]
#[ignore]
async fn duplicate_isbn_insert_is_business_error(pool: PgPool) {
    let books = PgBooksRepository::new(pool);
    books.create(&new_book(5)).await.unwrap();

    let err = books.create(&new_book(5)).await.unwrap_err();

    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[sqlx::test]
#[ignore]
async fn delete_removes_book(pool: PgPool) {
    let books = PgBooksRepository::new(pool);
    let saved = books.create(&new_book(77)).await.unwrap();
    let id = saved.id.unwrap();

    books.delete(id).await.unwrap();

    assert_eq!(books.find_by_id(id).await.unwrap(), None);
    assert!(matches!(books.delete(id).await, Err(AppError::NotFound(_))));
}

#[sqlx::test]
#[ignore]
async fn delete_book_with_loans_is_refused(pool: PgPool) {
    let books = PgBooksRepository::new(pool.clone());
    let loans = PgLoansRepository::new(pool);
    let book = books.create(&new_book(78)).await.unwrap();
    loans.create(&new_loan(&book, "vitor")).await.unwrap();

    let err = books.delete(book.id.unwrap()).await.unwrap_err();

    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[sqlx::test]
#[ignore]
async fn search_books_matches_substrings_ignoring_case(pool: PgPool) {
    let books = PgBooksRepository::new(pool);
    books
        .create(&Book {
            title: "The Hobbit".to_string(),
            author: "J. R. R. Tolkien".to_string(),
            ..new_book(1)
        })
        .await
        .unwrap();
    books.create(&new_book(2)).await.unwrap();

    let filter = BookFilter {
        title: Some("hob".to_string()),
        ..Default::default()
    };
    let page = books.search(&filter, PageRequest::new(0, 10)).await.unwrap();

    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].title, "The Hobbit");
    assert_eq!(page.page, 0);
    assert_eq!(page.size, 10);

    let all = books.search(&BookFilter::default(), PageRequest::new(0, 1)).await.unwrap();
    assert_eq!(all.total_elements, 2);
    assert_eq!(all.content.len(), 1);
    assert_eq!(all.total_pages, 2);
}

#[sqlx::test]
#[ignore]
async fn search_books_treats_wildcards_literally(pool: PgPool) {
    let books = PgBooksRepository::new(pool);
    books
        .create(&Book {
            title: "Dune".to_string(),
            ..new_book(1)
        })
        .await
        .unwrap();
    books
        .create(&Book {
            title: "500 Miles".to_string(),
            ..new_book(2)
        })
        .await
        .unwrap();
    books
        .create(&Book {
            title: "50% Off".to_string(),
            ..new_book(3)
        })
        .await
        .unwrap();

    for wildcard in ["%", "_"] {
        let filter = BookFilter {
            title: Some(wildcard.to_string()),
            ..Default::default()
        };
        let page = books.search(&filter, PageRequest::new(0, 10)).await.unwrap();
        assert!(page.content.iter().all(|b| b.title != "Dune"), "{wildcard} matched Dune");
    }

    let filter = BookFilter {
        title: Some("50%".to_string()),
        ..Default::default()
    };
    let page = books.search(&filter, PageRequest::new(0, 10)).await.unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].title, "50% Off");
}

#[sqlx::test]
#[ignore]
async fn outstanding_loan_is_detected_until_returned(pool: PgPool) {
    let books = PgBooksRepository::new(pool.clone());
    let loans = PgLoansRepository::new(pool);
    let book = books.create(&new_book(123231)).await.unwrap();
    let book_id = book.id.unwrap();

    assert!(!loans.exists_outstanding_for_book(book_id).await.unwrap());

    let mut loan = loans.create(&new_loan(&book, "vitor")).await.unwrap();
    assert!(loans.exists_outstanding_for_book(book_id).await.unwrap());

    loan.returned = Some(false);
    loans.update(loan.id.unwrap(), &loan).await.unwrap();
    assert!(loans.exists_outstanding_for_book(book_id).await.unwrap());

    loan.returned = Some(true);
    loans.update(loan.id.unwrap(), &loan).await.unwrap();
    assert!(!loans.exists_outstanding_for_book(book_id).await.unwrap());
}

#[sqlx::test]
#[ignore]
async fn find_loan_by_id_includes_book(pool: PgPool) {
    let books = PgBooksRepository::new(pool.clone());
    let loans = PgLoansRepository::new(pool);
    let book = books.create(&new_book(123231)).await.unwrap();
    let saved = loans.create(&new_loan(&book, "vitor")).await.unwrap();

    let found = loans.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();

    assert_eq!(found.customer, "vitor");
    assert_eq!(found.loan_date, saved.loan_date);
    assert_eq!(found.book, book);
    assert_eq!(found.returned, None);
}

#[sqlx::test]
#[ignore]
async fn update_unknown_loan_is_not_found(pool: PgPool) {
    let books = PgBooksRepository::new(pool.clone());
    let loans = PgLoansRepository::new(pool);
    let book = books.create(&new_book(1)).await.unwrap();

    let err = loans.update(424242, &new_loan(&book, "x")).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test]
#[ignore]
async fn search_loans_by_isbn_or_customer(pool: PgPool) {
    let books = PgBooksRepository::new(pool.clone());
    let loans = PgLoansRepository::new(pool);
    let first = books.create(&new_book(100)).await.unwrap();
    let second = books.create(&new_book(200)).await.unwrap();
    let third = books.create(&new_book(300)).await.unwrap();
    loans.create(&new_loan(&first, "vitor")).await.unwrap();
    loans.create(&new_loan(&second, "ana")).await.unwrap();
    loans.create(&new_loan(&third, "bruno")).await.unwrap();

    let filter = LoanFilter {
        isbn: Some(100),
        customer: Some("ana".to_string()),
    };
    let page = loans.search(&filter, PageRequest::new(0, 10)).await.unwrap();

    assert_eq!(page.total_elements, 2);
    let customers: Vec<&str> = page.content.iter().map(|l| l.customer.as_str()).collect();
    assert_eq!(customers, vec!["vitor", "ana"]);
    assert_eq!(page.page, 0);
    assert_eq!(page.size, 10);

    let by_isbn_only = LoanFilter {
        isbn: Some(300),
        customer: None,
    };
    let page = loans.search(&by_isbn_only, PageRequest::new(0, 10)).await.unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].book.isbn, 300);

    let everything = loans.search(&LoanFilter::default(), PageRequest::new(0, 2)).await.unwrap();
    assert_eq!(everything.total_elements, 3);
    assert_eq!(everything.content.len(), 2);
}
