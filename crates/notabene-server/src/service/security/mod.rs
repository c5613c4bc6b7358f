//! Security services: password hashing and session token keys.

mod password_hasher;
mod session_keys;

pub use self::password_hasher::PasswordHasher;
pub use self::session_keys::{IssuedToken, SessionKeys, SessionKeysConfig, TokenError};
