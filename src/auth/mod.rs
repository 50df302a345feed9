pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};

// Re-export necessary items
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Payload for a user login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for a new user registration request.
///
/// Length and structural checks live in the auth service, which reports them
/// as validation errors.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Response after a successful login: the bearer token the client presents on
/// every subsequent request.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
