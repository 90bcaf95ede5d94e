//! Admin authentication via HTTP Basic credentials.
//!
//! Implements constant-time comparison to mitigate timing attacks.

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use subtle::ConstantTimeEq;

use crate::config::AdminCredentials;
use crate::errors::AppError;

/// Admin auth layer function that takes the expected credentials as a parameter.
pub async fn admin_auth_layer(
    expected: Option<AdminCredentials>,
    request: Request,
    next: Next,
) -> Response {
    // If no credentials are configured, allow all requests (dev mode)
    let Some(expected) = expected else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic_credentials);

    match provided {
        Some((username, password)) if credentials_match(&username, &password, &expected) => {
            next.run(request).await
        }
        Some((username, _)) => {
            tracing::warn!("Rejected admin request for user {:?}", username);
            unauthorized_response("Invalid admin credentials")
        }
        None => unauthorized_response("Admin credentials required"),
    }
}

/// Decode an `Authorization: Basic ...` header value into username and password.
fn parse_basic_credentials(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Compare both fields without short-circuiting on the first mismatch.
fn credentials_match(username: &str, password: &str, expected: &AdminCredentials) -> bool {
    let user_ok = constant_time_compare(username, &expected.username);
    let pass_ok = constant_time_compare(password, &expected.password);
    user_ok & pass_ok
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response carrying a Basic challenge.
fn unauthorized_response(message: &str) -> Response {
    let mut response = AppError::Unauthorized(message.to_string()).into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"admin\""),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminCredentials {
        AdminCredentials {
            username: "admin".to_string(),
            password: "s3cret:with-colon".to_string(),
        }
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
        assert!(!constant_time_compare("short", "much-longer-key"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_parse_basic_credentials() {
        let header = format!("Basic {}", STANDARD.encode("admin:s3cret:with-colon"));
        let (user, pass) = parse_basic_credentials(&header).unwrap();
        assert_eq!(user, "admin");
        assert_eq!(pass, "s3cret:with-colon");
        assert!(credentials_match(&user, &pass, &admin()));
    }

    #[test]
    fn test_parse_basic_credentials_rejects_garbage() {
        assert!(parse_basic_credentials("Bearer abc").is_none());
        assert!(parse_basic_credentials("Basic !!!not-base64").is_none());
        let no_colon = format!("Basic {}", STANDARD.encode("admin"));
        assert!(parse_basic_credentials(&no_colon).is_none());
    }

    #[test]
    fn test_wrong_credentials_do_not_match() {
        assert!(!credentials_match("admin", "wrong", &admin()));
        assert!(!credentials_match("root", "s3cret:with-colon", &admin()));
    }
}
