//! Author endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{ApiPath, ApiQuery, ValidatedJson};
use crate::{
    error::{AppResult, ErrorResponse},
    models::{author::AuthorDto, book::BookDto},
};

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "All authors", body = Vec<AuthorDto>)
    )
)]
pub async fn list_authors(State(state): State<crate::AppState>) -> AppResult<Json<Vec<AuthorDto>>> {
    let authors = state.facades.authors.list().await?;
    Ok(Json(authors))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDto),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<AuthorDto>> {
    let author = state.facades.authors.get(id).await?;
    Ok(Json(author))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorDto,
    responses(
        (status = 201, description = "Author created", body = AuthorDto),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    ValidatedJson(data): ValidatedJson<AuthorDto>,
) -> AppResult<(StatusCode, Json<AuthorDto>)> {
    let author = state.facades.authors.create(data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = AuthorDto,
    responses(
        (status = 200, description = "Author updated", body = AuthorDto),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(data): ValidatedJson<AuthorDto>,
) -> AppResult<Json<AuthorDto>> {
    let author = state.facades.authors.update(id, data).await?;
    Ok(Json(author))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteAuthorParams {
    /// Also delete the books owned by the author
    pub force: Option<bool>,
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i64, Path, description = "Author ID"),
        DeleteAuthorParams
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 409, description = "Author still has books", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<DeleteAuthorParams>,
) -> AppResult<StatusCode> {
    state
        .facades
        .authors
        .delete(id, params.force.unwrap_or(false))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the books of an author
#[utoipa::path(
    get,
    path = "/authors/{id}/books",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books by the author", body = Vec<BookDto>),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn list_author_books(
    State(state): State<crate::AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.facades.authors.list_books(id).await?;
    Ok(Json(books))
}
