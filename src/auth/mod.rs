//! Authentication and session management
//!
//! Access and refresh tokens are HS256 JWTs. Every token carries a `jti`,
//! and revoking a token adds that `jti` to the process-wide [`Blocklist`]
//! held by the [`TokenManager`]. Handlers declare what they need through the
//! extractors in [`extractors`]:
//!
//! - [`AccessToken`]: any active access token
//! - [`FreshAccessToken`]: an access token issued straight from a login
//! - [`RefreshToken`]: an active refresh token

mod blocklist;
mod claims;
pub mod extractors;
mod password;
mod tokens;

pub use blocklist::Blocklist;
pub use claims::{Claims, TokenKind};
pub use extractors::{AccessToken, FreshAccessToken, RefreshToken};
pub use password::{PasswordError, PasswordHasher};
pub use tokens::{TokenManager, TokenSettings};
