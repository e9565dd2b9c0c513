//! Axum extractors that authenticate a request from its bearer token
//!
//! Each extractor pulls the token manager out of the router state through
//! `FromRef`, so they work with any state that can hand out an
//! `Arc<TokenManager>`.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{Claims, TokenKind, TokenManager};
use crate::errors::AuthError;

/// Reads the raw token from an `Authorization: Bearer <token>` header
pub fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken)
}

/// Any active access token
#[derive(Debug, Clone)]
pub struct AccessToken(pub Claims);

/// An active access token that was issued directly from a login
#[derive(Debug, Clone)]
pub struct FreshAccessToken(pub Claims);

/// An active refresh token
#[derive(Debug, Clone)]
pub struct RefreshToken(pub Claims);

impl<S> FromRequestParts<S> for AccessToken
where
    Arc<TokenManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenManager>::from_ref(state);
        let claims = tokens.verify(bearer_token(parts)?, TokenKind::Access)?;
        Ok(Self(claims))
    }
}

impl<S> FromRequestParts<S> for FreshAccessToken
where
    Arc<TokenManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenManager>::from_ref(state);
        let claims = tokens.verify_fresh(bearer_token(parts)?)?;
        Ok(Self(claims))
    }
}

impl<S> FromRequestParts<S> for RefreshToken
where
    Arc<TokenManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenManager>::from_ref(state);
        let claims = tokens.verify(bearer_token(parts)?, TokenKind::Refresh)?;
        Ok(Self(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/item");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&parts_with_header(Some("Bearer abc.def"))), Ok("abc.def"));
        assert_eq!(bearer_token(&parts_with_header(None)), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(&parts_with_header(Some("Basic abc"))), Err(AuthError::InvalidToken));
        assert_eq!(bearer_token(&parts_with_header(Some("Bearer "))), Err(AuthError::InvalidToken));
    }
}
