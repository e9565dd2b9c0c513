use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// Which half of a token pair a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Claims carried by every token this service issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity: the user ID rendered as a string
    pub sub: String,
    /// Unique token ID, the blocklist key
    pub jti: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Set only on access tokens minted from a credential check
    pub fresh: bool,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub is_admin: bool,
}

impl Claims {
    /// The user ID this token was issued for
    pub fn identity(&self) -> Result<i32, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::AdminRequired)
        }
    }
}
