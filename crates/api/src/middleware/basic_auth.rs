//! HTTP basic authentication for the customer routes.
//!
//! Runs before any extractor touches the body, so an unauthenticated request
//! is rejected before validation or persistence. Both halves of the
//! credential are compared in constant time.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::config::BasicAuthConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Credentials decoded from an `Authorization: Basic ...` header.
struct Credentials {
    username: String,
    password: String,
}

/// Decode a basic auth header value. `None` for any other scheme or for
/// malformed payloads.
fn parse_basic(header_value: &str) -> Option<Credentials> {
    let (scheme, encoded) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials {
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

/// Constant-time string comparison.
///
/// Compares against `expected` even on a length mismatch so timing does not
/// reveal the expected length.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

fn credentials_match(credentials: &Credentials, config: &BasicAuthConfig) -> bool {
    // Evaluate both so a wrong username costs the same as a wrong password.
    let user_ok = constant_time_eq(&credentials.username, &config.username);
    let pass_ok = constant_time_eq(&credentials.password, config.password.expose_secret());
    user_ok & pass_ok
}

/// Reject requests without valid basic auth credentials with 401.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic);

    match credentials {
        Some(ref c) if credentials_match(c, &state.config().auth) => next.run(request).await,
        Some(_) => {
            tracing::warn!("authentication failed: invalid credentials");
            AppError::Unauthorized.into_response()
        }
        None => {
            tracing::warn!("authentication failed: missing or malformed authorization header");
            AppError::Unauthorized.into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config() -> BasicAuthConfig {
        BasicAuthConfig {
            username: "api-user".to_string(),
            password: SecretString::from("correct-horse"),
        }
    }

    fn header_for(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    #[test]
    fn test_parse_basic() {
        let c = parse_basic(&header_for("api-user", "pa:ss")).unwrap();
        assert_eq!(c.username, "api-user");
        assert_eq!(c.password, "pa:ss");
    }

    #[test]
    fn test_parse_basic_rejects_other_schemes() {
        assert!(parse_basic("Bearer abc").is_none());
        assert!(parse_basic("Basic !!!not-base64").is_none());
        assert!(parse_basic(&format!("Basic {}", STANDARD.encode("nocolon"))).is_none());
    }

    #[test]
    fn test_credentials_match() {
        let good = parse_basic(&header_for("api-user", "correct-horse")).unwrap();
        assert!(credentials_match(&good, &config()));

        let wrong_pass = parse_basic(&header_for("api-user", "correct-horsE")).unwrap();
        assert!(!credentials_match(&wrong_pass, &config()));

        let wrong_user = parse_basic(&header_for("api-usr", "correct-horse")).unwrap();
        assert!(!credentials_match(&wrong_user, &config()));
    }

    #[test]
    fn test_constant_time_eq_length_mismatch() {
        assert!(!constant_time_eq("short", "much-longer"));
        assert!(constant_time_eq("same", "same"));
    }
}
