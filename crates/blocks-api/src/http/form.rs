//! Mark request extraction.
//!
//! The viewer posts the mark form urlencoded, but scripts also send the
//! fields in the query string or as multipart. All three are accepted and
//! merged; a body field wins over a query field of the same name. Bodies
//! of any other content type are ignored.
//!
//! Every rejection is answered with a `bad_data` envelope.

use crate::domain::action::MarkRequest;
use crate::domain::errors::ApiError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Multipart, Query, Request},
    http::header,
    Form,
};

type Fields = Vec<(String, String)>;

/// Extractor yielding the [`MarkRequest`] of a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkForm(pub MarkRequest);

#[async_trait]
impl<S> FromRequest<S> for MarkForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<Fields>::try_from_uri(req.uri())
            .map_err(|e| ApiError::bad_data(e.body_text()))?;

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let body = if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<Fields>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_data(e.body_text()))?;
            fields
        } else if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_data(e.body_text()))?;
            multipart_fields(multipart).await?
        } else {
            Vec::new()
        };

        Ok(MarkForm(merge_fields(&body, &query)))
    }
}

async fn multipart_fields(mut multipart: Multipart) -> Result<Fields, ApiError> {
    let mut fields = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_data(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| ApiError::bad_data(e.body_text()))?;
        fields.push((name, value));
    }
    Ok(fields)
}

/// First value of each mark field, body before query. Missing fields are
/// empty.
fn merge_fields(body: &[(String, String)], query: &[(String, String)]) -> MarkRequest {
    let value = |name: &str| {
        body.iter()
            .chain(query)
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    };

    MarkRequest::new(value("id"), value("action"), value("detail"))
}
