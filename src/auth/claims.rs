use serde::{Deserialize, Serialize};

/// JWT payload handed to clients after register/login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub username: String,
    pub iat: usize, // issued at (unix timestamp)
}
