use crate::application::book::{
    BookApplicationError, ServiceDependencies, add_book as execute_add_book,
    get_all_books as execute_get_all_books, reserve_book as execute_reserve_book,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{AddBookRequest, BookResponse, MessageResponse},
};

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// GET /books - 全書籍を書名順で取得
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = execute_get_all_books(&state.service_deps).await?;

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// POST /books - 書籍を登録
///
/// - ボディの形式不正、空白の書名・著者名は400
/// - 同じ書名・著者の書籍が既にある場合は409
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let book = req.to_book().map_err(BookApplicationError::from)?;

    if !execute_add_book(&state.service_deps, book).await? {
        return Err(ApiError::DuplicateBook);
    }

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Book created")),
    ))
}

/// POST /books/:name/:author/reserve - 書籍を予約
///
/// 存在しない書籍と予約済みの書籍は区別せず409を返す。
pub async fn reserve_book(
    State(state): State<Arc<AppState>>,
    Path((name, author)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !execute_reserve_book(&state.service_deps, &name, &author).await? {
        return Err(ApiError::ReservationConflict);
    }

    Ok(Json(MessageResponse::new("Book reserved")))
}
