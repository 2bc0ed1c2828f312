use rand::Rng;
use rusty_library_catalog::adapters::mock::BookPort as InMemoryBookPort;
use rusty_library_catalog::application::book::{
    BookApplicationError, ServiceDependencies, add_book, get_all_books, reserve_book,
};
use rusty_library_catalog::domain::{Book, BookValidationError};
use rusty_library_catalog::ports::book_port::{self, BookPort};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// テスト用のポート実装
// ============================================================================

/// 一覧と予約結果を固定で返すスタブ
///
/// ユースケースの読み取りと書き込みの間に他のリクエストが割り込んだ状況を再現する。
struct StubBookPort {
    books: Vec<Book>,
    reserve_result: bool,
    try_reserve_calls: AtomicUsize,
}

impl StubBookPort {
    fn new(books: Vec<Book>, reserve_result: bool) -> Self {
        Self {
            books,
            reserve_result,
            try_reserve_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl BookPort for StubBookPort {
    async fn list_all(&self) -> book_port::Result<Vec<Book>> {
        Ok(self.books.clone())
    }

    async fn insert(&self, _book: &Book) -> book_port::Result<()> {
        Ok(())
    }

    async fn try_reserve(&self, _name: &str, _author: &str) -> book_port::Result<bool> {
        self.try_reserve_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reserve_result)
    }
}

/// すべての呼び出しが失敗するポート
struct FailingBookPort;

#[async_trait::async_trait]
impl BookPort for FailingBookPort {
    async fn list_all(&self) -> book_port::Result<Vec<Book>> {
        Err("connection refused".into())
    }

    async fn insert(&self, _book: &Book) -> book_port::Result<()> {
        Err("connection refused".into())
    }

    async fn try_reserve(&self, _name: &str, _author: &str) -> book_port::Result<bool> {
        Err("connection refused".into())
    }
}

/// 一覧を読んだ直後に他のタスクへ制御を譲るポート
///
/// 複数の予約リクエストが同じ「未予約」の状態を読んだ状況を作る。
struct YieldingBookPort {
    inner: Arc<InMemoryBookPort>,
}

#[async_trait::async_trait]
impl BookPort for YieldingBookPort {
    async fn list_all(&self) -> book_port::Result<Vec<Book>> {
        let books = self.inner.list_all().await?;
        tokio::task::yield_now().await;
        Ok(books)
    }

    async fn insert(&self, book: &Book) -> book_port::Result<()> {
        self.inner.insert(book).await
    }

    async fn try_reserve(&self, name: &str, author: &str) -> book_port::Result<bool> {
        self.inner.try_reserve(name, author).await
    }
}

fn book(name: &str, author: &str) -> Book {
    Book::new(name, author).unwrap()
}

fn deps_with(port: Arc<InMemoryBookPort>) -> ServiceDependencies {
    ServiceDependencies { book_port: port }
}

// ============================================================================
// get_all_books
// ============================================================================

#[tokio::test]
async fn test_get_all_books_sorted_by_name() {
    // Arrange
    let port = Arc::new(InMemoryBookPort::with_books(vec![
        book("Les Misérables", "Victor Hugo"),
        book("Hamlet", "William Shakespeare"),
    ]));
    let deps = deps_with(port);

    // Act
    let books = get_all_books(&deps).await.unwrap();

    // Assert
    assert_eq!(
        books,
        vec![
            book("Hamlet", "William Shakespeare"),
            book("Les Misérables", "Victor Hugo"),
        ]
    );
}

#[tokio::test]
async fn test_get_all_books_case_insensitive_and_stable() {
    // Arrange
    let port = Arc::new(InMemoryBookPort::new());
    let deps = deps_with(port);

    assert!(add_book(&deps, book("Hamlet", "Shakespeare")).await.unwrap());
    assert!(add_book(&deps, book("Les Misérables", "Victor Hugo")).await.unwrap());
    assert!(add_book(&deps, book("hamlet", "Anon")).await.unwrap());

    // Act
    let books = get_all_books(&deps).await.unwrap();

    // Assert: 小文字キーが等しい書籍は挿入順を保つ
    let names: Vec<&str> = books.iter().map(|b| b.name()).collect();
    assert_eq!(names, vec!["Hamlet", "hamlet", "Les Misérables"]);
}

#[tokio::test]
async fn test_get_all_books_random_titles_are_sorted() {
    let mut rng = rand::thread_rng();

    for _ in 0..20 {
        let port = Arc::new(InMemoryBookPort::new());
        let deps = deps_with(port);

        let mut titles = Vec::new();
        for _ in 0..rng.gen_range(1..=100) {
            let len = rng.gen_range(1..=10);
            let title: String = (0..len)
                .map(|_| {
                    let letter = rng.gen_range(b'a'..=b'z') as char;
                    if rng.gen_bool(0.5) {
                        letter.to_ascii_uppercase()
                    } else {
                        letter
                    }
                })
                .collect();

            if add_book(&deps, book(&title, "Victor Hugo")).await.unwrap() {
                titles.push(title);
            }
        }
        // 小文字キーでの安定ソート（キーが等しければ挿入順）
        titles.sort_by_key(|title| title.to_lowercase());

        let names: Vec<String> = get_all_books(&deps)
            .await
            .unwrap()
            .iter()
            .map(|b| b.name().to_string())
            .collect();
        assert_eq!(names, titles);
    }
}

#[tokio::test]
async fn test_get_all_books_empty() {
    let deps = deps_with(Arc::new(InMemoryBookPort::new()));

    let books = get_all_books(&deps).await.unwrap();

    assert!(books.is_empty());
}

// ============================================================================
// add_book
// ============================================================================

#[tokio::test]
async fn test_add_book_returns_true_when_new() {
    // Arrange
    let port = Arc::new(InMemoryBookPort::new());
    let deps = deps_with(port.clone());

    // Act
    let added = add_book(&deps, book("Titre", "Auteur")).await.unwrap();

    // Assert
    assert!(added);
    assert_eq!(port.insert_calls(), 1);
    assert_eq!(port.snapshot(), vec![book("Titre", "Auteur")]);
}

#[tokio::test]
async fn test_add_book_twice_inserts_once() {
    // Arrange
    let port = Arc::new(InMemoryBookPort::new());
    let deps = deps_with(port.clone());

    // Act
    let first = add_book(&deps, book("Titre", "Auteur")).await.unwrap();
    let second = add_book(&deps, book("Titre", "Auteur")).await.unwrap();

    // Assert: 2回目はポートを呼ばずにfalse
    assert!(first);
    assert!(!second);
    assert_eq!(port.insert_calls(), 1);
}

#[tokio::test]
async fn test_add_book_same_name_other_author_is_allowed() {
    let port = Arc::new(InMemoryBookPort::with_books(vec![book("Hamlet", "Shakespeare")]));
    let deps = deps_with(port.clone());

    assert!(add_book(&deps, book("Hamlet", "Anon")).await.unwrap());
    assert!(add_book(&deps, book("hamlet", "Shakespeare")).await.unwrap());
    assert_eq!(port.snapshot().len(), 3);
}

#[tokio::test]
async fn test_add_book_propagates_port_error() {
    let deps = ServiceDependencies {
        book_port: Arc::new(FailingBookPort),
    };

    let result = add_book(&deps, book("Titre", "Auteur")).await;

    assert!(matches!(
        result,
        Err(BookApplicationError::BookPortError(_))
    ));
}

#[test]
fn test_blank_book_fails_validation() {
    assert_eq!(
        Book::new("", "X").unwrap_err(),
        BookValidationError::BlankName
    );
}

// ============================================================================
// reserve_book
// ============================================================================

#[tokio::test]
async fn test_reserve_book_success() {
    // Arrange
    let port = Arc::new(InMemoryBookPort::with_books(vec![book("Titre", "Auteur")]));
    let deps = deps_with(port.clone());

    // Act
    let reserved = reserve_book(&deps, "Titre", "Auteur").await.unwrap();

    // Assert: 再取得した値が予約済みになっている
    assert!(reserved);
    let books = get_all_books(&deps).await.unwrap();
    assert!(books[0].is_reserved());
}

#[tokio::test]
async fn test_reserve_book_not_found() {
    let port = Arc::new(InMemoryBookPort::with_books(vec![book("Titre", "Auteur")]));
    let deps = deps_with(port.clone());

    assert!(!reserve_book(&deps, "Titre", "Autre").await.unwrap());
    assert!(!reserve_book(&deps, "titre", "Auteur").await.unwrap());
    assert_eq!(port.try_reserve_calls(), 0);
}

#[tokio::test]
async fn test_reserve_book_already_reserved_skips_port() {
    // Arrange
    let port = Arc::new(InMemoryBookPort::with_books(vec![
        Book::with_reservation("Titre", "Auteur", true).unwrap(),
    ]));
    let deps = deps_with(port.clone());

    // Act
    let reserved = reserve_book(&deps, "Titre", "Auteur").await.unwrap();

    // Assert
    assert!(!reserved);
    assert_eq!(port.try_reserve_calls(), 0);
}

#[tokio::test]
async fn test_reserve_book_twice() {
    let port = Arc::new(InMemoryBookPort::with_books(vec![book("Titre", "Auteur")]));
    let deps = deps_with(port.clone());

    assert!(reserve_book(&deps, "Titre", "Auteur").await.unwrap());
    assert!(!reserve_book(&deps, "Titre", "Auteur").await.unwrap());
    assert_eq!(port.try_reserve_calls(), 1);
}

#[tokio::test]
async fn test_reserve_book_returns_port_result_verbatim() {
    // ポートが一覧では未予約と答え、条件付き更新では負ける（競合）
    let lost = Arc::new(StubBookPort::new(vec![book("Titre", "Auteur")], false));
    let deps = ServiceDependencies {
        book_port: lost.clone(),
    };
    assert!(!reserve_book(&deps, "Titre", "Auteur").await.unwrap());
    assert_eq!(lost.try_reserve_calls.load(Ordering::SeqCst), 1);

    let won = Arc::new(StubBookPort::new(vec![book("Titre", "Auteur")], true));
    let deps = ServiceDependencies {
        book_port: won.clone(),
    };
    assert!(reserve_book(&deps, "Titre", "Auteur").await.unwrap());
    assert_eq!(won.try_reserve_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_reservations_only_one_wins() {
    // Arrange: 全リクエストが未予約の状態を読んでから条件付き更新に進む
    let port = Arc::new(InMemoryBookPort::with_books(vec![book("Titre", "Auteur")]));
    let deps = ServiceDependencies {
        book_port: Arc::new(YieldingBookPort {
            inner: port.clone(),
        }),
    };

    // Act
    let results = futures::future::join_all(
        (0..8).map(|_| reserve_book(&deps, "Titre", "Auteur")),
    )
    .await;

    // Assert
    let wins = results
        .into_iter()
        .map(|r| r.unwrap())
        .filter(|reserved| *reserved)
        .count();
    assert_eq!(wins, 1);
    assert_eq!(port.try_reserve_calls(), 8);
    assert!(port.snapshot()[0].is_reserved());
}

#[tokio::test]
async fn test_reserve_book_propagates_port_error() {
    let deps = ServiceDependencies {
        book_port: Arc::new(FailingBookPort),
    };

    let result = reserve_book(&deps, "Titre", "Auteur").await;

    assert!(matches!(
        result,
        Err(BookApplicationError::BookPortError(_))
    ));
}
