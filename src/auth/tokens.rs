use std::fmt;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{Blocklist, Claims, TokenKind};
use crate::errors::AuthError;

/// Inputs needed to build a [`TokenManager`]
#[derive(Clone)]
pub struct TokenSettings {
    /// HS256 signing secret
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Identity whose tokens carry `is_admin = true`
    pub admin_identity: i32,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("admin_identity", &self.admin_identity)
            .finish()
    }
}

/// Issues, verifies and revokes tokens
///
/// Owns the signing keys and the blocklist, so one instance is shared by
/// every request through `Arc<TokenManager>` in the application state.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    admin_identity: i32,
    blocklist: Blocklist,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("admin_identity", &self.admin_identity)
            .field("revoked", &self.blocklist.len())
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(settings: TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
            admin_identity: settings.admin_identity,
            blocklist: Blocklist::new(),
        }
    }

    /// Whether tokens for `identity` carry the admin claim
    pub fn is_admin(&self, identity: i32) -> bool {
        identity == self.admin_identity
    }

    /// Builds the claims for a new token without signing it
    pub fn claims_for(&self, identity: i32, kind: TokenKind, fresh: bool) -> Claims {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        Claims {
            sub: identity.to_string(),
            jti: Uuid::new_v4().to_string(),
            kind,
            fresh: kind == TokenKind::Access && fresh,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            is_admin: self.is_admin(identity),
        }
    }

    /// Signs a set of claims
    pub fn encode(&self, claims: &Claims) -> Result<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .context("Failed to sign token")
    }

    #[instrument(skip(self))]
    pub fn issue_access_token(&self, identity: i32, fresh: bool) -> Result<String> {
        self.encode(&self.claims_for(identity, TokenKind::Access, fresh))
    }

    #[instrument(skip(self))]
    pub fn issue_refresh_token(&self, identity: i32) -> Result<String> {
        self.encode(&self.claims_for(identity, TokenKind::Refresh, false))
    }

    /// Checks signature and expiry only
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "Rejected token");
                match err.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })
    }

    /// Full verification: signature, expiry, token type, then blocklist
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let claims = self.decode(token)?;

        if claims.kind != expected {
            return Err(AuthError::WrongTokenType {
                expected: expected.as_str(),
            });
        }
        if self.blocklist.is_revoked(&claims.jti) {
            debug!(jti = %claims.jti, "Rejected revoked token");
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }

    /// Verifies an access token and additionally requires it to be fresh
    pub fn verify_fresh(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.verify(token, TokenKind::Access)?;
        if !claims.fresh {
            return Err(AuthError::FreshTokenRequired);
        }
        Ok(claims)
    }

    /// Adds the token's `jti` to the blocklist
    pub fn revoke(&self, claims: &Claims) -> bool {
        self.blocklist.revoke(&claims.jti)
    }
}
