//! Caller identity
//!
//! The caller is identified by the `opengpts_user_id` cookie.

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, StatusCode},
};

use crate::error::{route_error, RouteError};

pub const USER_ID_COOKIE: &str = "opengpts_user_id";

/// Identity of the requesting user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = RouteError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(user_id_from_cookie_header)
            .map(UserId)
            .ok_or_else(|| {
                route_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Missing {} cookie", USER_ID_COOKIE),
                )
            })
    }
}

fn user_id_from_cookie_header(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == USER_ID_COOKIE)
        .and_then(|(_, value)| urlencoding::decode(value.trim_matches('"')).ok())
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())
}
