//! Credential, token, and request-authentication components

pub mod middleware;
pub mod models;
pub mod password;
pub mod tokens;
pub mod users;

pub use middleware::{authenticate, extract_bearer_token};
pub use models::{LoginRequest, RegisterRequest, User, UserInfo};
pub use password::{hash_password, verify_password};
pub use tokens::{Token, TokenIssuer};
pub use users::UserStore;
