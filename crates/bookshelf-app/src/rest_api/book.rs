mod dto;
mod form;
mod mapper;

pub use dto::BookDto;
pub use form::BookForm;
pub use mapper::{to_dto_list, MappingError};

use bookshelf_dal::book::BookRepository;

use crate::{repository_from_request, state::AppState};
use axum::routing::get;

repository_from_request!(BookRepository);

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        crud_api::list,
        crud_api::create,
        crud_api::read,
        crud_api::update,
        crud_api::delete
    ),
    components(schemas(
        BookDto,
        BookForm,
        crate::error::ErrorBody,
        crate::validate::ValidationErrors,
        crate::validate::Violation
    ))
)]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

mod crud_api {
    use axum::response::{IntoResponse, Response};
    use bookshelf_dal::book::BookRepository;
    use http::StatusCode;
    use tracing::debug;
    use uuid::Uuid;

    use super::{BookDto, BookForm};
    use crate::{
        error::{ApiError, ApiResult},
        rest_api::{empty_list_response, json_response, RecordId},
        validate::ValidJson,
    };

    #[cfg_attr(feature = "openapi", utoipa::path(get, path = "", tag = "Book", operation_id = "listBooks",
        responses(
            (status = 200, description = "All books", body = Vec<BookDto>),
            (status = 500, description = "Data access failure", body = crate::error::ErrorBody))))]
    pub async fn list(repository: BookRepository) -> ApiResult<Response> {
        let books = repository.list().await.map_err(ApiError::DataAccess)?;
        if books.is_empty() {
            return Ok(empty_list_response());
        }
        json_response(StatusCode::OK, &super::to_dto_list(books))
    }

    #[cfg_attr(feature = "openapi", utoipa::path(post, path = "", tag = "Book", operation_id = "createBook",
        request_body = BookForm,
        responses(
            (status = 201, description = "Book created"),
            (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
            (status = 422, description = "Validation failed", body = crate::validate::ValidationErrors),
            (status = 500, description = "Data insert failure", body = crate::error::ErrorBody))))]
    pub async fn create(
        repository: BookRepository,
        ValidJson(form): ValidJson<BookForm>,
    ) -> ApiResult<impl IntoResponse> {
        let book = form.into_model()?;
        let id = Uuid::new_v4();
        repository
            .create(id, &book)
            .await
            .map_err(ApiError::DataInsert)?;
        debug!(%id, "Created book");

        Ok(StatusCode::CREATED)
    }

    #[cfg_attr(feature = "openapi", utoipa::path(get, path = "/{id}", tag = "Book", operation_id = "readBook",
        params(("id" = String, Path, description = "Book ID")),
        responses(
            (status = 200, description = "Book", body = BookDto),
            (status = 400, description = "Invalid ID", body = crate::error::ErrorBody),
            (status = 404, description = "Book not found"),
            (status = 500, description = "Data access failure", body = crate::error::ErrorBody))))]
    pub async fn read(
        RecordId(id): RecordId,
        repository: BookRepository,
    ) -> ApiResult<Response> {
        let book = repository
            .get(id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ApiError::NotFound
                } else {
                    ApiError::DataAccess(e)
                }
            })?;

        json_response(StatusCode::OK, &BookDto::from(book))
    }

    #[cfg_attr(feature = "openapi", utoipa::path(put, path = "/{id}", tag = "Book", operation_id = "updateBook",
        params(("id" = String, Path, description = "Book ID")),
        request_body = BookForm,
        responses(
            (status = 200, description = "Book updated"),
            (status = 400, description = "Invalid ID or malformed body", body = crate::error::ErrorBody),
            (status = 404, description = "Book not found"),
            (status = 422, description = "Validation failed", body = crate::validate::ValidationErrors),
            (status = 500, description = "Data update failure", body = crate::error::ErrorBody))))]
    pub async fn update(
        RecordId(id): RecordId,
        repository: BookRepository,
        ValidJson(form): ValidJson<BookForm>,
    ) -> ApiResult<impl IntoResponse> {
        let book = form.into_model()?;
        let rows = repository
            .update(id, &book)
            .await
            .map_err(ApiError::DataUpdate)?;
        if rows == 0 {
            return Err(ApiError::NotFound);
        }
        debug!(%id, "Updated book");

        Ok(StatusCode::OK)
    }

    #[cfg_attr(feature = "openapi", utoipa::path(delete, path = "/{id}", tag = "Book", operation_id = "deleteBook",
        params(("id" = String, Path, description = "Book ID")),
        responses(
            (status = 200, description = "Book deleted"),
            (status = 400, description = "Invalid ID or data remove failure", body = crate::error::ErrorBody),
            (status = 404, description = "Book not found"))))]
    pub async fn delete(
        RecordId(id): RecordId,
        repository: BookRepository,
    ) -> ApiResult<impl IntoResponse> {
        let rows = repository
            .delete(id)
            .await
            .map_err(ApiError::DataRemove)?;
        if rows == 0 {
            return Err(ApiError::NotFound);
        }
        debug!(%id, "Deleted book");

        Ok(StatusCode::OK)
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(crud_api::list).post(crud_api::create))
        .route(
            "/{id}",
            get(crud_api::read)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
}
