use crate::domain::Book;
use crate::ports::BookPort;
use std::sync::Arc;

use super::errors::{BookApplicationError, Result};

/// サービスの依存関係
///
/// 振る舞いは持たず、関数に依存関係を渡すためのデータ構造。
/// 呼び出し間で共有される可変状態は持たない（共有資源はポートの先のストアのみ）。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_port: Arc<dyn BookPort>,
}

/// ポートから全書籍を取得するヘルパー関数
///
/// 予約状態をキャッシュせず、判定の前に毎回読み直すために使われる。
async fn load_books(book_port: &Arc<dyn BookPort>) -> Result<Vec<Book>> {
    book_port
        .list_all()
        .await
        .map_err(BookApplicationError::BookPortError)
}

/// 全書籍を書名のアルファベット順で取得する
///
/// 並び順は書名を小文字化したキーによる昇順。
/// キーが等しい書籍はポートが返した順序を保つ（安定ソート）。
pub async fn get_all_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    let mut books = load_books(&deps.book_port).await?;
    books.sort_by_cached_key(Book::sort_key);

    tracing::debug!(count = books.len(), "Listed books");

    Ok(books)
}

/// 書籍を登録する
///
/// ビジネスルール：
/// - 同じ (name, author) の書籍が既に存在する場合は登録しない
///
/// 重複は想定内の結果として`Ok(false)`を返し、ポートへの書き込みは行わない。
/// ストレージ側の一意制約はこのチェックとは独立した最終防衛線。
///
/// # 戻り値
/// 登録した場合は`true`、重複のため登録しなかった場合は`false`
pub async fn add_book(deps: &ServiceDependencies, book: Book) -> Result<bool> {
    // 1. 既存書籍の重複確認
    let books = load_books(&deps.book_port).await?;

    if books.iter().any(|existing| existing.same_identity(&book)) {
        tracing::info!(
            book_name = book.name(),
            author = book.author(),
            "Book already exists, skipping insert"
        );
        return Ok(false);
    }

    // 2. ポートに保存
    deps.book_port
        .insert(&book)
        .await
        .map_err(BookApplicationError::BookPortError)?;

    tracing::info!(book_name = book.name(), author = book.author(), "Book added");

    Ok(true)
}

/// 書籍を予約する
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 書籍が未予約であること
///
/// いずれかを満たさない場合はポートの予約呼び出しを行わずに`Ok(false)`を返す。
/// 事前の読み取りはロックではないため、最終的な判定は
/// ポートの条件付き更新の結果をそのまま返す。
///
/// # 戻り値
/// 予約できた場合は`true`、存在しないか既に予約済みの場合は`false`
pub async fn reserve_book(deps: &ServiceDependencies, name: &str, author: &str) -> Result<bool> {
    // 1. 最新の状態を読み直して対象を探す
    let books = load_books(&deps.book_port).await?;

    let available = books
        .iter()
        .find(|book| book.matches(name, author))
        .is_some_and(|book| !book.is_reserved());

    if !available {
        tracing::info!(book_name = name, author, "Book not found or already reserved");
        return Ok(false);
    }

    // 2. ポートの条件付き更新に委ねる
    let reserved = deps
        .book_port
        .try_reserve(name, author)
        .await
        .map_err(BookApplicationError::BookPortError)?;

    if reserved {
        tracing::info!(book_name = name, author, "Book reserved");
    } else {
        tracing::info!(book_name = name, author, "Reservation lost to a concurrent request");
    }

    Ok(reserved)
}
