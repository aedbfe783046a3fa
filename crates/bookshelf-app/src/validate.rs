use axum::extract::{FromRequest, Request};
use bytes::Bytes;
use garde::{Report, Validate};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;

/// JSON body that was decoded and then passed all its garde rules.
///
/// Body is decoded regardless of `Content-Type`. Any decoding problem,
/// including missing or unreadable body, is rejected as [`ApiError::JsonDecode`],
/// rule violations as [`ApiError::Validation`] listing every failed rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate<Context = ()>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::JsonDecode(e.to_string()))?;
        let value: T =
            serde_json::from_slice(&body).map_err(|e| ApiError::JsonDecode(e.to_string()))?;

        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Single failed rule.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Violation {
    pub field: String,
    pub error: String,
}

/// Body of validation failure response, violations are in field declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValidationErrors {
    pub errors: Vec<Violation>,
}

impl From<Report> for ValidationErrors {
    fn from(report: Report) -> Self {
        let errors = report
            .iter()
            .map(|(path, error)| Violation {
                field: path.to_string(),
                error: error.message().to_string(),
            })
            .collect();
        ValidationErrors { errors }
    }
}
