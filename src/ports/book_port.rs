use crate::domain::Book;
use async_trait::async_trait;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 同一の (name, author) が既にストレージに存在する
///
/// ユースケース層の重複チェックをすり抜けた場合に、
/// アダプターが`insert`から返す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Book with same name and author already exists: {name} / {author}")]
pub struct DuplicateBook {
    pub name: String,
    pub author: String,
}

impl DuplicateBook {
    pub fn of(book: &Book) -> Self {
        Self {
            name: book.name().to_string(),
            author: book.author().to_string(),
        }
    }
}

/// 書籍永続化ポート
///
/// ユースケースとストレージの境界。
/// 読み取りと条件付き書き込みのみを提供し、ロックは持たない。
#[async_trait]
pub trait BookPort: Send + Sync {
    /// 保存されているすべての書籍を返す
    ///
    /// 順序は保証しない。
    async fn list_all(&self) -> Result<Vec<Book>>;

    /// 新しい書籍を保存する
    ///
    /// 同一の (name, author) が既に存在する場合は`DuplicateBook`で失敗する。
    async fn insert(&self, book: &Book) -> Result<()>;

    /// 未予約の書籍を予約済みに遷移させる
    ///
    /// 「未予約であること」を条件とした原子的な更新。
    /// 実際に行が変更された場合のみ`true`を返す。
    async fn try_reserve(&self, name: &str, author: &str) -> Result<bool>;
}
