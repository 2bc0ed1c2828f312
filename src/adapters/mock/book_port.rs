use crate::domain::Book;
use crate::ports::book_port::{BookPort as BookPortTrait, DuplicateBook, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// BookPortのインメモリ実装
///
/// 挿入順に書籍を保持し、PostgreSQLアダプターと同じ重複・条件付き予約の
/// 振る舞いを再現する。テスト用に書き込み系の呼び出し回数を記録する。
pub struct BookPort {
    books: Mutex<Vec<Book>>,
    insert_calls: AtomicUsize,
    try_reserve_calls: AtomicUsize,
}

impl BookPort {
    pub fn new() -> Self {
        Self::with_books(Vec::new())
    }

    /// 初期データを指定して作成
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books),
            insert_calls: AtomicUsize::new(0),
            try_reserve_calls: AtomicUsize::new(0),
        }
    }

    /// `insert`が呼ばれた回数
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// `try_reserve`が呼ばれた回数
    pub fn try_reserve_calls(&self) -> usize {
        self.try_reserve_calls.load(Ordering::SeqCst)
    }

    /// 保存されている書籍のスナップショット（挿入順）
    pub fn snapshot(&self) -> Vec<Book> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Book>> {
        // 保持しているのは値の列だけなので、ポイズンしても中身は有効
        self.books
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for BookPort {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookPortTrait for BookPort {
    async fn list_all(&self) -> Result<Vec<Book>> {
        Ok(self.lock().clone())
    }

    async fn insert(&self, book: &Book) -> Result<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        let mut books = self.lock();
        if books.iter().any(|existing| existing.same_identity(book)) {
            return Err(DuplicateBook::of(book).into());
        }
        books.push(book.clone());
        Ok(())
    }

    /// 未予約の一致する書籍を、予約済みの新しい値で置き換える
    async fn try_reserve(&self, name: &str, author: &str) -> Result<bool> {
        self.try_reserve_calls.fetch_add(1, Ordering::SeqCst);

        let mut books = self.lock();
        match books
            .iter_mut()
            .find(|book| book.matches(name, author) && !book.is_reserved())
        {
            Some(slot) => {
                *slot = slot.reserved();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
