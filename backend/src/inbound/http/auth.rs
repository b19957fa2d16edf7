//! Request-level identity resolution helpers.
//!
//! Each protected route resolves exactly one identity path — bearer header
//! or session cookie — before any authorization gate runs. These helpers
//! parse the `Authorization` header; token and session semantics live in
//! the account service.

use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;

use crate::domain::{Error, Identity};
use crate::inbound::http::state::HttpState;

/// Raw `Authorization` header value, if one was sent.
pub fn authorization_header(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let value = authorization_header(req)
        .ok_or_else(|| Error::unauthorized("a bearer token is required"))?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("authorization header is malformed"))?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(Error::unauthorized("authorization scheme must be Bearer"));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::unauthorized("bearer token is empty"));
    }
    Ok(token.to_owned())
}

/// Resolve the caller through the bearer-token path, failing closed.
pub async fn authenticate_bearer(
    state: &HttpState,
    req: &HttpRequest,
) -> Result<Identity, Error> {
    let token = bearer_token(req)?;
    state.accounts.resolve_bearer(&token).await
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some("Basic abc"))]
    #[case(Some("Bearer"))]
    #[case(Some("Bearer   "))]
    fn malformed_bearer_headers_are_refused(#[case] header: Option<&str>) {
        let mut req = TestRequest::get();
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let req = req.to_http_request();
        assert!(bearer_token(&req).is_err());
    }

    #[test]
    fn bearer_token_is_extracted() {
        let req = TestRequest::get()
            .insert_header((AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).expect("token parses"), "abc.def.ghi");
    }
}
