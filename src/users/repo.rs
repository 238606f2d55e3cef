use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{
    MessageFrom, MessageFromRow, MessageTo, MessageToRow, NewUser, UserDetail, UserSummary,
};
use crate::error::RepoError;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn register(&self, user: &NewUser, password_hash: &str) -> Result<UserDetail, RepoError>;
    async fn password_hash(&self, username: &str) -> Result<Option<String>, RepoError>;
    /// Returns `false` when no such user exists.
    async fn update_login_timestamp(&self, username: &str) -> Result<bool, RepoError>;
    async fn all(&self) -> Result<Vec<UserSummary>, RepoError>;
    async fn get(&self, username: &str) -> Result<Option<UserDetail>, RepoError>;
    async fn messages_from(&self, username: &str) -> Result<Vec<MessageFrom>, RepoError>;
    async fn messages_to(&self, username: &str) -> Result<Vec<MessageTo>, RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn register(&self, user: &NewUser, password_hash: &str) -> Result<UserDetail, RepoError> {
        sqlx::query_as::<_, UserDetail>(
            r#"
            INSERT INTO users (username, password, first_name, last_name, phone, join_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, current_timestamp, current_timestamp)
            RETURNING username, first_name, last_name, phone, join_at, last_login_at
            "#,
        )
        .bind(&user.username)
        .bind(password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            RepoError::from_insert(e, || format!("Username '{}' is already taken", user.username))
        })
    }

    async fn password_hash(&self, username: &str) -> Result<Option<String>, RepoError> {
        let hash = sqlx::query_scalar::<_, String>(
            r#"SELECT password FROM users WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(hash)
    }

    async fn update_login_timestamp(&self, username: &str) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"UPDATE users SET last_login_at = current_timestamp WHERE username = $1"#,
        )
        .bind(username)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> Result<Vec<UserSummary>, RepoError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT username, first_name, last_name, phone
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn get(&self, username: &str) -> Result<Option<UserDetail>, RepoError> {
        let user = sqlx::query_as::<_, UserDetail>(
            r#"
            SELECT username, first_name, last_name, phone, join_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn messages_from(&self, username: &str) -> Result<Vec<MessageFrom>, RepoError> {
        let rows = sqlx::query_as::<_, MessageFromRow>(
            r#"
            SELECT m.id, m.to_username, u.first_name, u.last_name, u.phone,
                   m.body, m.sent_at, m.read_at
              FROM messages AS m
              JOIN users AS u ON m.to_username = u.username
             WHERE m.from_username = $1
             ORDER BY m.sent_at, m.id
            "#,
        )
        .bind(username)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(MessageFrom::from).collect())
    }

    async fn messages_to(&self, username: &str) -> Result<Vec<MessageTo>, RepoError> {
        let rows = sqlx::query_as::<_, MessageToRow>(
            r#"
            SELECT m.id, m.from_username, u.first_name, u.last_name, u.phone,
                   m.body, m.sent_at, m.read_at
              FROM messages AS m
              JOIN users AS u ON m.from_username = u.username
             WHERE m.to_username = $1
             ORDER BY m.sent_at, m.id
            "#,
        )
        .bind(username)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(MessageTo::from).collect())
    }
}
