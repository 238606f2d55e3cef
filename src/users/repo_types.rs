use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Columns written at registration besides the password hash.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Basic info, as listed by `GET /users` and embedded in messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserDetail {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(with = "time::serde::rfc3339")]
    pub join_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_login_at: OffsetDateTime,
}

/// Flat row of a sent message joined with its recipient.
#[derive(Debug, FromRow)]
pub struct MessageFromRow {
    pub id: i32,
    pub to_username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub body: String,
    pub sent_at: OffsetDateTime,
    pub read_at: Option<OffsetDateTime>,
}

/// Flat row of a received message joined with its sender.
#[derive(Debug, FromRow)]
pub struct MessageToRow {
    pub id: i32,
    pub from_username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub body: String,
    pub sent_at: OffsetDateTime,
    pub read_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageFrom {
    pub id: i32,
    pub to_user: UserSummary,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageTo {
    pub id: i32,
    pub from_user: UserSummary,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
}

impl From<MessageFromRow> for MessageFrom {
    fn from(r: MessageFromRow) -> Self {
        Self {
            id: r.id,
            to_user: UserSummary {
                username: r.to_username,
                first_name: r.first_name,
                last_name: r.last_name,
                phone: r.phone,
            },
            body: r.body,
            sent_at: r.sent_at,
            read_at: r.read_at,
        }
    }
}

impl From<MessageToRow> for MessageTo {
    fn from(r: MessageToRow) -> Self {
        Self {
            id: r.id,
            from_user: UserSummary {
                username: r.from_username,
                first_name: r.first_name,
                last_name: r.last_name,
                phone: r.phone,
            },
            body: r.body,
            sent_at: r.sent_at,
            read_at: r.read_at,
        }
    }
}
