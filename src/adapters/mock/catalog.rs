use crate::domain::value_objects::BookId;
use crate::ports::catalog::{CatalogAvailability, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// CatalogAvailabilityのモック実装
///
/// 貸出可能な書籍の集合を保持することで状態を持ったテストをサポート。
/// set_availabilityは集合を実際に更新するため、貸出後の再確認は
/// 「貸出不可」を観測する。
pub struct CatalogService {
    available_books: Mutex<HashSet<BookId>>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self {
            available_books: Mutex::new(HashSet::new()),
        }
    }

    /// テスト用に貸出可能な書籍を登録
    pub fn add_available_book(&self, book_id: BookId) {
        self.available_books.lock().unwrap().insert(book_id);
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogAvailability for CatalogService {
    /// 登録された書籍の中で貸出可能かチェック
    async fn is_available(&self, book_id: &BookId) -> Result<bool> {
        Ok(self.available_books.lock().unwrap().contains(book_id))
    }

    /// 在庫フラグを集合へ反映する
    async fn set_availability(&self, book_id: &BookId, available: bool) -> Result<()> {
        let mut books = self.available_books.lock().unwrap();
        if available {
            books.insert(book_id.clone());
        } else {
            books.remove(book_id);
        }
        Ok(())
    }
}
