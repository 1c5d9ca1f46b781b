//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::{Form, Json};

use super::error::ApiError;
use crate::models::list::{ListParams, PARAM_KEY};

/// Extract a list id from the path.
///
/// Anything that is not an integer cannot name a stored list, so it is a 404.
pub struct ListId(pub i64);

impl<S> FromRequestParts<S> for ListId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest {
                message: e.body_text(),
            })?;

        raw.parse::<i64>().map(Self).map_err(|_| ApiError::NotFound {
            resource: "list",
            id: raw,
        })
    }
}

/// Allow-listed list attributes from a form or JSON body
impl<S> FromRequest<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let params = if is_json {
            let Json(body): Json<serde_json::Value> = Json::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest {
                    message: e.body_text(),
                })?;
            ListParams::from_json(&body)
        } else {
            let Form(pairs): Form<Vec<(String, String)>> = Form::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest {
                    message: e.body_text(),
                })?;
            ListParams::from_form_pairs(pairs)
        };

        params.ok_or(ApiError::ParameterMissing { param: PARAM_KEY })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    async fn extract(content_type: &str, body: &'static str) -> Result<ListParams, ApiError> {
        let req = HttpRequest::builder()
            .method("POST")
            .uri("/lists")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        ListParams::from_request(req, &()).await
    }

    #[tokio::test]
    async fn form_body() {
        let params = extract(
            "application/x-www-form-urlencoded",
            "list%5Bname%5D=Weekend+chores&list%5Bid%5D=5",
        )
        .await
        .unwrap();
        assert_eq!(params.name.as_deref(), Some("Weekend chores"));
    }

    #[tokio::test]
    async fn json_body() {
        let params = extract("application/json", r#"{"list":{"name":"Books","extra":true}}"#)
            .await
            .unwrap();
        assert_eq!(params.name.as_deref(), Some("Books"));
    }

    #[tokio::test]
    async fn missing_list_key() {
        let err = extract("application/x-www-form-urlencoded", "name=Books")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ParameterMissing { param: "list" }));
    }

    #[tokio::test]
    async fn malformed_json() {
        let err = extract("application/json", "{not json").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }
}
