/// Authentication module
///
/// Token issuance and validation, password hashing, the refresh token cache,
/// the failed login counter, and the service that ties them together.

mod claims;
mod jwt;
mod lockout;
mod password;
mod refresh_token;
mod service;

pub use claims::Claims;
pub use jwt::{TokenCodec, TokenError, TokenKind};
pub use lockout::FailedAttemptCounter;
pub use password::{PasswordError, PasswordHasher, MAX_COST, MIN_COST};
pub use refresh_token::RefreshTokenCache;
pub use service::{AuthService, TokenPair};
