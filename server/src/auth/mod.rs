mod crypto;
pub mod db;
mod extractor;
pub mod jwt;

pub use crypto::{hash_password, verify_password};
pub use extractor::{AccountOwner, AuthError, AuthUser};
pub use jwt::{Claims, IssuedToken, JwtKeys, TokenType};
