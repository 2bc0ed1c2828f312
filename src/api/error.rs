use crate::application::book::BookApplicationError;
use crate::ports::DuplicateBook;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと、ユースケースが`false`で返した結果を
/// HTTPレスポンスにマッピングする。
#[derive(Debug)]
pub enum ApiError {
    /// リクエストボディの形式が不正
    BadRequest(String),
    /// 同じ書名・著者の書籍が既に存在する
    DuplicateBook,
    /// 書籍が存在しないか既に予約済み
    ReservationConflict,
    Application(BookApplicationError),
}

impl From<BookApplicationError> for ApiError {
    fn from(err: BookApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 400 Bad Request - 入力不正
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Application(BookApplicationError::Validation(e)) => {
                (StatusCode::BAD_REQUEST, "INVALID_BOOK", e.to_string())
            }

            // 409 Conflict - 重複・予約競合
            ApiError::DuplicateBook => (
                StatusCode::CONFLICT,
                "DUPLICATE_BOOK",
                "A book with this name and author already exists".to_string(),
            ),
            ApiError::ReservationConflict => (
                StatusCode::CONFLICT,
                "RESERVATION_CONFLICT",
                "Book is already reserved or does not exist".to_string(),
            ),
            // ユースケースのチェック後にストレージの一意制約で弾かれた場合
            ApiError::Application(BookApplicationError::BookPortError(ref e))
                if e.downcast_ref::<DuplicateBook>().is_some() =>
            {
                tracing::warn!("Duplicate rejected by storage: {}", e);
                (
                    StatusCode::CONFLICT,
                    "DUPLICATE_BOOK",
                    "A book with this name and author already exists".to_string(),
                )
            }

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApiError::Application(BookApplicationError::BookPortError(e)) => {
                tracing::error!("Book port error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
