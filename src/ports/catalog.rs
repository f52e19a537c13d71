use crate::domain::value_objects::BookId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// カタログ在庫ポート
///
/// 貸出コンテキストとカタログコンテキストの境界を維持する。
/// カタログは信頼できないリモート依存として扱う：すべての呼び出しは
/// ネットワーク障害の可能性があり、失敗は握りつぶさず呼び出し元へ返す。
#[async_trait]
pub trait CatalogAvailability: Send + Sync {
    /// 書籍が貸出可能か確認する
    ///
    /// 失敗・タイムアウトはエラーとして返す。不明を「貸出可能」とはしない。
    async fn is_available(&self, book_id: &BookId) -> Result<bool>;

    /// 書籍の在庫フラグを更新する
    async fn set_availability(&self, book_id: &BookId, available: bool) -> Result<()>;
}
