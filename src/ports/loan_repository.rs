use crate::domain::loan::Loan;
use crate::domain::value_objects::LoanId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出リポジトリポート
///
/// 貸出レコードの永続化を抽象化する。
/// 貸出は削除されない（追記のみの貸出台帳として扱う）。
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 貸出を保存する（新規作成・更新どちらも）
    async fn save(&self, loan: Loan) -> Result<()>;

    /// IDで貸出を取得する
    async fn find_by_id(&self, loan_id: &LoanId) -> Result<Option<Loan>>;

    /// すべての貸出を取得する
    async fn find_all(&self) -> Result<Vec<Loan>>;
}
