//! Response selection: format negotiation, flash notices, and response builders

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{ACCEPT, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};

/// Media type for Turbo Stream fragments
pub const TURBO_STREAM_MIME: &str = "text/vnd.turbo-stream.html";

/// Cookie carrying a notice across a redirect
pub const NOTICE_COOKIE: &str = "listkeep_notice";

/// Representation requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Full page (default)
    Html,
    /// Incremental fragment update, no navigation
    TurboStream,
    Json,
}

impl Format {
    /// Pick a format from an `Accept` header value.
    pub fn from_accept(accept: &str) -> Self {
        let accept = accept.to_ascii_lowercase();
        if accept.contains(TURBO_STREAM_MIME) {
            Self::TurboStream
        } else if accept.contains("application/json") && !accept.contains("text/html") {
            Self::Json
        } else {
            Self::Html
        }
    }
}

impl<S> FromRequestParts<S> for Format
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map_or(Self::Html, Self::from_accept))
    }
}

/// Notice left by the previous request, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash(Option<String>);

impl Flash {
    pub fn notice(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn from_cookie_header(header: &str) -> Self {
        let notice = header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == NOTICE_COOKIE)
            .and_then(|(_, value)| urlencoding::decode(value).ok())
            .map(|value| value.into_owned())
            .filter(|value| !value.is_empty());
        Self(notice)
    }
}

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(Flash::from_cookie_header)
            .find(|flash| flash.0.is_some())
            .unwrap_or_default())
    }
}

/// 303 redirect that carries `notice` to the next page.
pub fn redirect_with_notice(location: &str, notice: &str) -> Response {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        NOTICE_COOKIE,
        urlencoding::encode(notice)
    );
    (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(location)).into_response()
}

/// Full HTML page. A displayed flash is cleared so it shows only once.
pub fn page(status: StatusCode, html: String, flash: &Flash) -> Response {
    if flash.notice().is_some() {
        let clear = format!("{}=; Path=/; Max-Age=0", NOTICE_COOKIE);
        (status, AppendHeaders([(SET_COOKIE, clear)]), Html(html)).into_response()
    } else {
        (status, Html(html)).into_response()
    }
}

/// Turbo Stream fragment response.
pub fn turbo_stream(status: StatusCode, body: String) -> Response {
    (
        status,
        [(CONTENT_TYPE, format!("{}; charset=utf-8", TURBO_STREAM_MIME))],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_accept() {
        assert_eq!(
            Format::from_accept("text/vnd.turbo-stream.html, text/html, application/xhtml+xml"),
            Format::TurboStream
        );
        assert_eq!(Format::from_accept("application/json"), Format::Json);
        assert_eq!(
            Format::from_accept("text/html,application/xhtml+xml,application/json;q=0.9"),
            Format::Html
        );
        assert_eq!(Format::from_accept("*/*"), Format::Html);
    }

    #[test]
    fn flash_reads_encoded_cookie() {
        let flash = Flash::from_cookie_header("theme=dark; listkeep_notice=List%20successfully%20created.");
        assert_eq!(flash.notice(), Some("List successfully created."));

        assert_eq!(Flash::from_cookie_header("theme=dark").notice(), None);
        assert_eq!(Flash::from_cookie_header("listkeep_notice=").notice(), None);
    }

    #[test]
    fn redirect_sets_notice_cookie() {
        let response = redirect_with_notice("/lists", "List successfully edited.");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/lists");

        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("listkeep_notice=List%20successfully%20edited."));
    }

    #[test]
    fn page_clears_shown_flash() {
        let flash = Flash::from_cookie_header("listkeep_notice=hi");
        let response = page(StatusCode::OK, "<p>hi</p>".into(), &flash);
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));

        let response = page(StatusCode::OK, "<p>hi</p>".into(), &Flash::default());
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn turbo_stream_content_type() {
        let response = turbo_stream(StatusCode::OK, String::new());
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/vnd.turbo-stream.html; charset=utf-8"
        );
    }
}
