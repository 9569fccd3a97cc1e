//! Request body extractors shared by modules

use axum::{
    extract::{FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;

/// Body extractor accepting either a JSON or an urlencoded form body.
///
/// Any other (or missing) content type yields `T::default()`, so a bare POST
/// behaves like a form with every field left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormOrJson<T>(pub T);

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let mime = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json")) {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Json => Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| Self(value))
                .map_err(IntoResponse::into_response),
            BodyKind::Form => Form::<T>::from_request(req, state)
                .await
                .map(|Form(value)| Self(value))
                .map_err(IntoResponse::into_response),
            BodyKind::Other => {
                tracing::debug!("request body has no form or JSON content type, using defaults");
                Ok(Self(T::default()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Payload {
        #[serde(default)]
        id: String,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Payload, StatusCode> {
        let mut builder = Request::post("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        FormOrJson::<Payload>::from_request(req, &())
            .await
            .map(|FormOrJson(payload)| payload)
            .map_err(|response| response.status())
    }

    #[tokio::test]
    async fn test_json_body_is_decoded() {
        let payload = extract(Some("application/json; charset=utf-8"), r#"{"id":"r-1"}"#)
            .await
            .unwrap();
        assert_eq!(payload.id, "r-1");
    }

    #[tokio::test]
    async fn test_form_body_is_decoded() {
        let payload = extract(Some("application/x-www-form-urlencoded"), "id=r-2")
            .await
            .unwrap();
        assert_eq!(payload.id, "r-2");
    }

    #[tokio::test]
    async fn test_missing_content_type_uses_defaults() {
        assert_eq!(extract(None, "id=r-3").await.unwrap(), Payload::default());
        assert_eq!(
            extract(Some("text/plain"), "id=r-3").await.unwrap(),
            Payload::default()
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let status = extract(Some("application/json"), "{not json").await.unwrap_err();
        assert!(status.is_client_error());
    }
}
