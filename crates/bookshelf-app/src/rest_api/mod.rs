pub mod book;

use axum::{
    extract::{FromRequestParts, Path},
    response::{IntoResponse, Response},
};
use http::{header, request::Parts, StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

const APPLICATION_JSON: &str = "application/json";

/// Serializes `value` up front, so that encoding problem is reported as [`ApiError::JsonEncode`].
pub(crate) fn json_response<T: Serialize>(status: StatusCode, value: &T) -> ApiResult<Response> {
    let body = serde_json::to_vec(value).map_err(ApiError::JsonEncode)?;
    Ok((status, [(header::CONTENT_TYPE, APPLICATION_JSON)], body).into_response())
}

/// Empty JSON array, sent literally.
pub(crate) fn empty_list_response() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, APPLICATION_JSON)],
        "[]",
    )
        .into_response()
}

/// Record identifier taken from `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub Uuid);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::InvalidId(e.to_string()))?;
        let id = Uuid::parse_str(&id).map_err(|e| ApiError::InvalidId(e.to_string()))?;
        Ok(RecordId(id))
    }
}
