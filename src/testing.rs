//! In-memory repositories and request helpers for handler tests.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;

use crate::{
    app::build_app,
    books::{
        repo::BookRepo,
        repo_types::{Book, BookFilter, BookUpdate},
    },
    error::RepoError,
    state::AppState,
    users::{
        repo::UserRepo,
        repo_types::{MessageFrom, MessageTo, NewUser, UserDetail, UserSummary},
    },
};

struct StoredUser {
    password: String,
    detail: UserDetail,
}

struct StoredMessage {
    id: i32,
    from_username: String,
    to_username: String,
    body: String,
    sent_at: OffsetDateTime,
    read_at: Option<OffsetDateTime>,
}

#[derive(Default)]
pub struct MemoryUserRepo {
    users: Mutex<BTreeMap<String, StoredUser>>,
    messages: Mutex<Vec<StoredMessage>>,
}

impl MemoryUserRepo {
    pub fn seed_message(&self, from: &str, to: &str, body: &str) -> i32 {
        let mut messages = self.messages.lock().unwrap();
        let id = messages.len() as i32 + 1;
        messages.push(StoredMessage {
            id,
            from_username: from.into(),
            to_username: to.into(),
            body: body.into(),
            sent_at: OffsetDateTime::now_utc(),
            read_at: None,
        });
        id
    }

    fn summary(&self, username: &str) -> UserSummary {
        let users = self.users.lock().unwrap();
        let d = &users[username].detail;
        UserSummary {
            username: d.username.clone(),
            first_name: d.first_name.clone(),
            last_name: d.last_name.clone(),
            phone: d.phone.clone(),
        }
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn register(&self, user: &NewUser, password_hash: &str) -> Result<UserDetail, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.username) {
            return Err(RepoError::Conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        let now = OffsetDateTime::now_utc();
        let detail = UserDetail {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            join_at: now,
            last_login_at: now,
        };
        users.insert(
            user.username.clone(),
            StoredUser {
                password: password_hash.to_string(),
                detail: detail.clone(),
            },
        );
        Ok(detail)
    }

    async fn password_hash(&self, username: &str) -> Result<Option<String>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(username)
            .map(|u| u.password.clone()))
    }

    async fn update_login_timestamp(&self, username: &str) -> Result<bool, RepoError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(username) {
            Some(u) => {
                u.detail.last_login_at = OffsetDateTime::now_utc();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn all(&self) -> Result<Vec<UserSummary>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .map(|u| UserSummary {
                username: u.detail.username.clone(),
                first_name: u.detail.first_name.clone(),
                last_name: u.detail.last_name.clone(),
                phone: u.detail.phone.clone(),
            })
            .collect())
    }

    async fn get(&self, username: &str) -> Result<Option<UserDetail>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(username)
            .map(|u| u.detail.clone()))
    }

    async fn messages_from(&self, username: &str) -> Result<Vec<MessageFrom>, RepoError> {
        let sent: Vec<(i32, String, String, OffsetDateTime, Option<OffsetDateTime>)> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.from_username == username)
            .map(|m| (m.id, m.to_username.clone(), m.body.clone(), m.sent_at, m.read_at))
            .collect();
        Ok(sent
            .into_iter()
            .map(|(id, to, body, sent_at, read_at)| MessageFrom {
                id,
                to_user: self.summary(&to),
                body,
                sent_at,
                read_at,
            })
            .collect())
    }

    async fn messages_to(&self, username: &str) -> Result<Vec<MessageTo>, RepoError> {
        let received: Vec<(i32, String, String, OffsetDateTime, Option<OffsetDateTime>)> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.to_username == username)
            .map(|m| (m.id, m.from_username.clone(), m.body.clone(), m.sent_at, m.read_at))
            .collect();
        Ok(received
            .into_iter()
            .map(|(id, from, body, sent_at, read_at)| MessageTo {
                id,
                from_user: self.summary(&from),
                body,
                sent_at,
                read_at,
            })
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryBookRepo {
    books: Mutex<BTreeMap<String, Book>>,
}

#[async_trait]
impl BookRepo for MemoryBookRepo {
    async fn find_all(&self, filter: &BookFilter) -> Result<Vec<Book>, RepoError> {
        let mut books: Vec<Book> = self
            .books
            .lock()
            .unwrap()
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn find_one(&self, isbn: &str) -> Result<Option<Book>, RepoError> {
        Ok(self.books.lock().unwrap().get(isbn).cloned())
    }

    async fn create(&self, book: &Book) -> Result<Book, RepoError> {
        let mut books = self.books.lock().unwrap();
        if books.contains_key(&book.isbn) {
            return Err(RepoError::Conflict(format!(
                "A book with isbn '{}' already exists",
                book.isbn
            )));
        }
        books.insert(book.isbn.clone(), book.clone());
        Ok(book.clone())
    }

    async fn update(&self, isbn: &str, update: &BookUpdate) -> Result<Option<Book>, RepoError> {
        let mut books = self.books.lock().unwrap();
        Ok(books.get_mut(isbn).map(|book| {
            update.apply_to(book);
            book.clone()
        }))
    }

    async fn remove(&self, isbn: &str) -> Result<bool, RepoError> {
        Ok(self.books.lock().unwrap().remove(isbn).is_some())
    }
}

/// A router over fresh in-memory repositories, plus handles to seed them.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<MemoryUserRepo>,
    pub books: Arc<MemoryBookRepo>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserRepo::default());
        let books = Arc::new(MemoryBookRepo::default());
        let mut state = AppState::fake();
        state.users = users.clone() as Arc<dyn UserRepo>;
        state.books = books.clone() as Arc<dyn BookRepo>;
        Self {
            router: build_app(state.clone()),
            state,
            users,
            books,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }
}
