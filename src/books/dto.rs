use serde::Serialize;

use super::repo_types::Book;
use crate::schema::{FieldSpec, FieldType, Schema};

pub const BOOK_CREATE: Schema = Schema {
    fields: &[
        FieldSpec::required("isbn", FieldType::String),
        FieldSpec::required("amazon_url", FieldType::String),
        FieldSpec::required("author", FieldType::String),
        FieldSpec::required("language", FieldType::String),
        FieldSpec::required("pages", FieldType::Integer),
        FieldSpec::required("publisher", FieldType::String),
        FieldSpec::required("title", FieldType::String),
        FieldSpec::required("year", FieldType::Integer),
    ],
    forbidden: &[],
    additional_properties: false,
};

pub const BOOK_UPDATE: Schema = Schema {
    fields: &[
        FieldSpec::optional("amazon_url", FieldType::String),
        FieldSpec::optional("author", FieldType::String),
        FieldSpec::optional("language", FieldType::String),
        FieldSpec::optional("pages", FieldType::Integer),
        FieldSpec::optional("publisher", FieldType::String),
        FieldSpec::optional("title", FieldType::String),
        FieldSpec::optional("year", FieldType::Integer),
    ],
    forbidden: &["isbn"],
    additional_properties: false,
};

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book: Book,
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
