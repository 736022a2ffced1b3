//! Request Authorization
//!
//! Bearer-token check run at the top of every datapoint handler.

use axum::http::{header, HeaderMap};

use crate::auth::{AuthError, AuthResult, Caller, JwtManager, Role};

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the caller and check it holds `required`
pub fn authorize(headers: &HeaderMap, jwt: &JwtManager, required: Role) -> AuthResult<Caller> {
    let token = extract_bearer_token(headers).ok_or(AuthError::MissingToken)?;
    let caller = jwt.authenticate(token)?;
    caller.authorize(required)?;
    Ok(caller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header() {
        let jwt = JwtManager::new(JwtConfig::default());
        assert_eq!(
            authorize(&HeaderMap::new(), &jwt, Role::User),
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            authorize(&headers_with("Basic dXNlcjpwYXNz"), &jwt, Role::User),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn test_role_enforced() {
        let jwt = JwtManager::new(JwtConfig::default());
        let token = jwt.generate_token("u1", Role::User).unwrap();
        let headers = headers_with(&format!("Bearer {}", token));

        let caller = authorize(&headers, &jwt, Role::User).unwrap();
        assert_eq!(caller.id, "u1");
        assert_eq!(
            authorize(&headers, &jwt, Role::Admin),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn test_garbage_token() {
        let jwt = JwtManager::new(JwtConfig::default());
        assert!(matches!(
            authorize(&headers_with("Bearer abc"), &jwt, Role::User),
            Err(AuthError::MalformedToken)
        ));
    }
}
