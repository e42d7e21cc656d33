// src/utils/user_key.rs

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;

pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Opaque per-user key taken from the `x-user-email` header.
///
/// Trimmed and lower-cased. This identifies the user for seeding and lazy
/// creation only; it is not an authentication mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserKey(pub String);

impl UserKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts and normalizes the key.
    ///
    /// Non-ASCII addresses are accepted as long as the raw bytes are UTF-8.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let missing = || AppError::BadRequest(format!("{} header is required", USER_EMAIL_HEADER));

        let value = headers.get(USER_EMAIL_HEADER).ok_or_else(missing)?;
        let raw = std::str::from_utf8(value.as_bytes()).map_err(|_| {
            AppError::BadRequest(format!("{} header must be valid UTF-8", USER_EMAIL_HEADER))
        })?;

        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            return Err(missing());
        }
        Ok(UserKey(key))
    }
}

/// Axum Middleware: User Key.
///
/// Rejects requests without a usable `x-user-email` header with 400.
/// Otherwise injects `UserKey` into the request extensions for handlers to use.
pub async fn require_user_key(mut req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let key = UserKey::from_headers(req.headers())?;

    req.extensions_mut().insert(key);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: HeaderValue) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_EMAIL_HEADER, value);
        headers
    }

    #[test]
    fn test_normalizes_header() {
        let headers = headers_with(HeaderValue::from_static("  Alice@Example.COM "));
        assert_eq!(
            UserKey::from_headers(&headers).unwrap(),
            UserKey("alice@example.com".to_string())
        );
    }

    #[test]
    fn test_accepts_utf8_address() {
        let headers = headers_with(HeaderValue::from_bytes("É@x.com".as_bytes()).unwrap());
        assert_eq!(
            UserKey::from_headers(&headers).unwrap(),
            UserKey("é@x.com".to_string())
        );
    }

    #[test]
    fn test_missing_or_blank_header() {
        let err = UserKey::from_headers(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "x-user-email header is required"));

        let err = UserKey::from_headers(&headers_with(HeaderValue::from_static("   "))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "x-user-email header is required"));
    }

    #[test]
    fn test_invalid_utf8_has_own_message() {
        let headers = headers_with(HeaderValue::from_bytes(&[0xff, b'@', b'x']).unwrap());
        let err = UserKey::from_headers(&headers).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("valid UTF-8")));
    }
}
