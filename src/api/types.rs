use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookValidationError};

/// 書籍の登録リクエスト（POST /books）
///
/// `isReserved`は受け付けるが、新規登録は常に未予約として扱う。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBookRequest {
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub is_reserved: bool,
}

impl AddBookRequest {
    /// ドメインの書籍に変換する（バリデーション付き）
    pub fn to_book(&self) -> Result<Book, BookValidationError> {
        Book::new(self.name.as_str(), self.author.as_str())
    }
}

/// 書籍レスポンス（GET /books）
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub name: String,
    pub author: String,
    pub is_reserved: bool,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            name: book.name().to_string(),
            author: book.author().to_string(),
            is_reserved: book.is_reserved(),
        }
    }
}

/// 成功時のメッセージレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
