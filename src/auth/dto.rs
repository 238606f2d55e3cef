use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::{FieldSpec, FieldType, Schema};
use crate::users::repo_types::NewUser;

pub const REGISTER: Schema = Schema {
    fields: &[
        FieldSpec::required("username", FieldType::String),
        FieldSpec::required("password", FieldType::String),
        FieldSpec::required("first_name", FieldType::String),
        FieldSpec::required("last_name", FieldType::String),
        FieldSpec::required("phone", FieldType::String),
    ],
    forbidden: &[],
    additional_properties: false,
};

pub const LOGIN: Schema = Schema {
    fields: &[
        FieldSpec::required("username", FieldType::String),
        FieldSpec::required("password", FieldType::String),
    ],
    forbidden: &[],
    additional_properties: false,
};

/// Request body for user registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "must be between 1 and 64 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub phone: String,
}

impl RegisterRequest {
    /// Splits off the plaintext password from the columns stored as-is.
    pub fn into_parts(self) -> (NewUser, String) {
        let user = NewUser {
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
        };
        (user, self.password)
    }
}

/// Request body for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
