use thiserror::Error;

/// 書籍の構築時バリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookValidationError {
    /// 書名が空白
    #[error("Name must not be blank")]
    BlankName,
    /// 著者名が空白
    #[error("Author must not be blank")]
    BlankAuthor,
}
