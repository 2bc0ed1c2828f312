use super::errors::BookValidationError;

/// 書籍 - カタログ管理コンテキストの値オブジェクト
///
/// 業務上の同一性は (name, author) の組で決まり、サロゲートキーは持たない。
///
/// 不変条件：name と author は空白のみであってはならない。
/// 予約状態はその場で書き換えず、ポートから再取得した新しい値で表現する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    name: String,
    author: String,
    is_reserved: bool,
}

impl Book {
    /// 未予約の書籍を作成する
    ///
    /// # エラー
    /// name または author が空白のみの場合は`BookValidationError`を返す
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<Self, BookValidationError> {
        Self::with_reservation(name, author, false)
    }

    /// 予約状態を指定して書籍を作成する
    ///
    /// ストレージから読み出した行の復元に使用される。
    pub fn with_reservation(
        name: impl Into<String>,
        author: impl Into<String>,
        is_reserved: bool,
    ) -> Result<Self, BookValidationError> {
        let name = name.into();
        let author = author.into();

        if name.trim().is_empty() {
            return Err(BookValidationError::BlankName);
        }
        if author.trim().is_empty() {
            return Err(BookValidationError::BlankAuthor);
        }

        Ok(Self {
            name,
            author,
            is_reserved,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn is_reserved(&self) -> bool {
        self.is_reserved
    }

    /// (name, author) が完全一致するか（大文字小文字を区別する）
    pub fn matches(&self, name: &str, author: &str) -> bool {
        self.name == name && self.author == author
    }

    /// 同一の書籍か（業務上の同一性）
    pub fn same_identity(&self, other: &Book) -> bool {
        self.matches(&other.name, &other.author)
    }

    /// 一覧の並び替えキー（小文字化した書名）
    pub fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// 予約済みの新しい値を返す
    ///
    /// 自身は変更しない。アダプターが条件付き更新に成功した後の状態を表す。
    pub fn reserved(&self) -> Self {
        Self {
            name: self.name.clone(),
            author: self.author.clone(),
            is_reserved: true,
        }
    }
}
