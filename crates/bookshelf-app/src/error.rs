use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;
use tracing::{debug, error};

use crate::validate::{ValidationErrors, Violation};

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("json decode failure")]
    JsonDecode(String),

    #[error("json encode failure")]
    JsonEncode(#[source] serde_json::Error),

    #[error("invalid url param-id")]
    InvalidId(String),

    #[error("validation failed")]
    Validation(ValidationErrors),

    #[error("not found")]
    NotFound,

    #[error("db data access failure")]
    DataAccess(#[source] bookshelf_dal::Error),

    #[error("db data insert failure")]
    DataInsert(#[source] bookshelf_dal::Error),

    #[error("db data update failure")]
    DataUpdate(#[source] bookshelf_dal::Error),

    #[error("db data remove failure")]
    DataRemove(#[source] bookshelf_dal::Error),
}

/// Body of every error response except validation failures and not found.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::JsonDecode(_) | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::DataRemove(_) => StatusCode::BAD_REQUEST,
            ApiError::JsonEncode(_)
            | ApiError::DataAccess(_)
            | ApiError::DataInsert(_)
            | ApiError::DataUpdate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            ApiError::JsonDecode(detail) | ApiError::InvalidId(detail) => {
                debug!("Rejected request, {self}: {detail}")
            }
            ApiError::Validation(errors) => debug!("Rejected request, {self}: {errors:?}"),
            ApiError::NotFound => debug!("Requested record not found"),
            ApiError::JsonEncode(e) => error!("{self}: {e}"),
            ApiError::DataAccess(e)
            | ApiError::DataInsert(e)
            | ApiError::DataUpdate(e)
            | ApiError::DataRemove(e) => error!("{self}: {e}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        match self {
            ApiError::NotFound => status.into_response(),
            ApiError::Validation(errors) => (status, Json(errors)).into_response(),
            other => (
                status,
                Json(ErrorBody {
                    error: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

impl From<garde::Report> for ApiError {
    fn from(report: garde::Report) -> Self {
        ApiError::Validation(report.into())
    }
}

impl From<crate::rest_api::book::MappingError> for ApiError {
    fn from(error: crate::rest_api::book::MappingError) -> Self {
        ApiError::Validation(ValidationErrors {
            errors: vec![Violation {
                field: error.field().to_string(),
                error: error.to_string(),
            }],
        })
    }
}
