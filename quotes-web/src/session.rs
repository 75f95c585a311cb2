//! Viewer session cookie
//!
//! Every viewer carries a random session id in the `quotes_session` cookie.
//! Vote eligibility tokens are keyed by it. A request without a usable
//! cookie gets a fresh id, and the response sets the cookie.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderValue,
    },
    response::{IntoResponse, Response},
};
use quotes_common::SessionId;
use std::convert::Infallible;

pub const SESSION_COOKIE: &str = "quotes_session";

/// Session of the viewer making the request
#[derive(Debug, Clone, Copy)]
pub struct ViewerSession {
    pub id: SessionId,
    /// True when the id was minted for this request
    pub is_new: bool,
}

impl ViewerSession {
    /// Attach the session cookie to a response if the session is new
    pub fn attach(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.is_new {
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, self.id
            );
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ViewerSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let existing = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(session_from_cookie_header);

        Ok(match existing {
            Some(id) => ViewerSession { id, is_new: false },
            None => ViewerSession {
                id: SessionId::new(),
                is_new: true,
            },
        })
    }
}

/// Find a valid session id in one `Cookie` header value
fn session_from_cookie_header(header: &str) -> Option<SessionId> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .find_map(|(_, value)| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_parsing() {
        let id = SessionId::new();
        let header = format!("theme=dark; {}={}; lang=en", SESSION_COOKIE, id);
        assert_eq!(session_from_cookie_header(&header), Some(id));
    }

    #[test]
    fn test_invalid_session_value_ignored() {
        let header = format!("{}=garbage", SESSION_COOKIE);
        assert_eq!(session_from_cookie_header(&header), None);
        assert_eq!(session_from_cookie_header("other=1"), None);
    }

    #[test]
    fn test_attach_sets_cookie_only_for_new_sessions() {
        let id = SessionId::new();

        let fresh = ViewerSession { id, is_new: true }.attach("ok");
        let cookie = fresh.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with(&format!("{}={}", SESSION_COOKIE, id)));
        assert!(cookie.contains("HttpOnly"));

        let known = ViewerSession { id, is_new: false }.attach("ok");
        assert!(known.headers().get(SET_COOKIE).is_none());
    }
}
