use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A catalog entry. Also the creation payload, which must carry every column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Book {
    #[validate(length(min = 1, max = 32, message = "must be between 1 and 32 characters"))]
    pub isbn: String,
    #[validate(url(message = "must be a URL"))]
    pub amazon_url: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub language: String,
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub pages: i32,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    pub year: i32,
}

/// Partial update; `None` keeps the stored value. The isbn never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct BookUpdate {
    #[validate(url(message = "must be a URL"))]
    pub amazon_url: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub author: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub language: Option<String>,
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub pages: Option<i32>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub publisher: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: Option<String>,
    pub year: Option<i32>,
}

#[cfg(test)]
impl BookUpdate {
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(v) = &self.amazon_url {
            book.amazon_url = v.clone();
        }
        if let Some(v) = &self.author {
            book.author = v.clone();
        }
        if let Some(v) = &self.language {
            book.language = v.clone();
        }
        if let Some(v) = self.pages {
            book.pages = v;
        }
        if let Some(v) = &self.publisher {
            book.publisher = v.clone();
        }
        if let Some(v) = &self.title {
            book.title = v.clone();
        }
        if let Some(v) = self.year {
            book.year = v;
        }
    }
}

/// Optional `GET /books` query. Text fields match case-insensitively by substring.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilter {
    pub author: Option<String>,
    pub title: Option<String>,
    pub publisher: Option<String>,
    pub language: Option<String>,
    pub year: Option<i32>,
}

#[cfg(test)]
impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }
        contains(&book.author, &self.author)
            && contains(&book.title, &self.title)
            && contains(&book.publisher, &self.publisher)
            && contains(&book.language, &self.language)
            && self.year.map_or(true, |y| book.year == y)
    }
}

#[cfg(test)]
pub(crate) fn don_quixote() -> Book {
    Book {
        isbn: "8675309".into(),
        amazon_url: "https://amazon.com".into(),
        author: "Miguel Cervantes".into(),
        language: "Espanol".into(),
        pages: 1100,
        publisher: "Real Academia Espanola".into(),
        title: "Don Quixote de la mancha".into(),
        year: 1605,
    }
}
