use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Book, BookFilter, BookUpdate};
use crate::error::RepoError;

#[async_trait]
pub trait BookRepo: Send + Sync {
    async fn find_all(&self, filter: &BookFilter) -> Result<Vec<Book>, RepoError>;
    async fn find_one(&self, isbn: &str) -> Result<Option<Book>, RepoError>;
    async fn create(&self, book: &Book) -> Result<Book, RepoError>;
    /// `None` when no book has this isbn.
    async fn update(&self, isbn: &str, update: &BookUpdate) -> Result<Option<Book>, RepoError>;
    /// `false` when no book has this isbn.
    async fn remove(&self, isbn: &str) -> Result<bool, RepoError>;
}

/// `ILIKE` pattern matching `needle` as a literal substring, for `ESCAPE '\'`.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct PgBookRepo {
    db: PgPool,
}

impl PgBookRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepo for PgBookRepo {
    async fn find_all(&self, filter: &BookFilter) -> Result<Vec<Book>, RepoError> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, amazon_url, author, language, pages, publisher, title, year
              FROM books
             WHERE ($1::text IS NULL OR author ILIKE $1 ESCAPE '\')
               AND ($2::text IS NULL OR title ILIKE $2 ESCAPE '\')
               AND ($3::text IS NULL OR publisher ILIKE $3 ESCAPE '\')
               AND ($4::text IS NULL OR language ILIKE $4 ESCAPE '\')
               AND ($5::int IS NULL OR year = $5)
             ORDER BY title
            "#,
        )
        .bind(filter.author.as_deref().map(contains_pattern))
        .bind(filter.title.as_deref().map(contains_pattern))
        .bind(filter.publisher.as_deref().map(contains_pattern))
        .bind(filter.language.as_deref().map(contains_pattern))
        .bind(filter.year)
        .fetch_all(&self.db)
        .await?;
        Ok(books)
    }

    async fn find_one(&self, isbn: &str) -> Result<Option<Book>, RepoError> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, amazon_url, author, language, pages, publisher, title, year
              FROM books
             WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.db)
        .await?;
        Ok(book)
    }

    async fn create(&self, book: &Book) -> Result<Book, RepoError> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING isbn, amazon_url, author, language, pages, publisher, title, year
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            RepoError::from_insert(e, || format!("A book with isbn '{}' already exists", book.isbn))
        })
    }

    async fn update(&self, isbn: &str, update: &BookUpdate) -> Result<Option<Book>, RepoError> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
               SET amazon_url = COALESCE($1, amazon_url),
                   author     = COALESCE($2, author),
                   language   = COALESCE($3, language),
                   pages      = COALESCE($4, pages),
                   publisher  = COALESCE($5, publisher),
                   title      = COALESCE($6, title),
                   year       = COALESCE($7, year)
             WHERE isbn = $8
            RETURNING isbn, amazon_url, author, language, pages, publisher, title, year
            "#,
        )
        .bind(&update.amazon_url)
        .bind(&update.author)
        .bind(&update.language)
        .bind(update.pages)
        .bind(&update.publisher)
        .bind(&update.title)
        .bind(update.year)
        .bind(isbn)
        .fetch_optional(&self.db)
        .await?;
        Ok(book)
    }

    async fn remove(&self, isbn: &str) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM books WHERE isbn = $1"#)
            .bind(isbn)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
