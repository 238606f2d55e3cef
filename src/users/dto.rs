use serde::Serialize;

use super::repo_types::{MessageFrom, MessageTo, UserSummary};

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct MessagesFromResponse {
    pub messages: Vec<MessageFrom>,
}

#[derive(Debug, Serialize)]
pub struct MessagesToResponse {
    pub messages: Vec<MessageTo>,
}
