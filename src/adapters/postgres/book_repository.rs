use crate::domain::Book;
use crate::ports::book_port::{BookPort, DuplicateBook, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{PgPool, Row, postgres::PgRow};

/// 一意制約違反のSQLSTATE
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQLの行データをBookに変換する
///
/// 保存済みの行がバリデーションを満たさない場合はInvalidDataエラーとする。
fn map_row_to_book(row: &PgRow) -> Result<Book> {
    let title: String = row.try_get("title")?;
    let author: String = row.try_get("author")?;
    let is_reserved: bool = row.try_get("is_reserved")?;

    Book::with_reservation(title, author, is_reserved).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })
}

/// BookPortのPostgreSQL実装
///
/// bookテーブルに対して読み取りと条件付き更新を行う。
/// 予約の排他は`is_reserved = FALSE`を条件とするUPDATEで保証する。
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// PostgreSQLコネクションプールから新しいBookRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookPort for BookRepository {
    async fn list_all(&self) -> Result<Vec<Book>> {
        sqlx::query(
            r#"
            SELECT title, author, is_reserved
            FROM book
            "#,
        )
        .fetch(&self.pool)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
        .and_then(|row| async move { map_row_to_book(&row) })
        .try_collect()
        .await
    }

    /// 書籍を保存する
    ///
    /// (title, author) の一意制約違反は`DuplicateBook`に変換する。
    async fn insert(&self, book: &Book) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO book (title, author)
            VALUES ($1, $2)
            "#,
        )
        .bind(book.name())
        .bind(book.author())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(DuplicateBook::of(book).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 未予約の行のみを予約済みに更新する
    ///
    /// 更新された行がある場合のみ`true`。同時に予約しても成功するのは1件だけ。
    async fn try_reserve(&self, name: &str, author: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE book
            SET is_reserved = TRUE
            WHERE title = $1 AND author = $2 AND is_reserved = FALSE
            "#,
        )
        .bind(name)
        .bind(author)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
