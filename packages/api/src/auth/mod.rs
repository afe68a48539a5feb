//! Authentication: password hashing and bearer tokens.

mod password;
mod token;

pub use password::{hash_password, verify_password, MIN_CREDENTIAL_LEN};
pub use token::{AuthUser, Claims, TokenKeys, TOKEN_TTL_SECS};
