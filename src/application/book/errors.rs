use crate::domain::BookValidationError;
use thiserror::Error;

/// 書籍管理アプリケーション層のエラー
///
/// 重複登録と予約競合はエラーではなく`false`で表現されるため、ここには含まれない。
#[derive(Debug, Error)]
pub enum BookApplicationError {
    /// 書籍のバリデーションエラー
    #[error("Invalid book: {0}")]
    Validation(#[from] BookValidationError),

    /// BookPortのエラー（変換・リトライせずにそのまま伝播する）
    #[error("Book port error")]
    BookPortError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookApplicationError>;
