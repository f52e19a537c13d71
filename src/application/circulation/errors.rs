use thiserror::Error;

use crate::domain::value_objects::{BookId, LoanId};

/// 貸出ワークフローのエラー
#[derive(Debug, Error)]
pub enum CirculationError {
    /// 書籍が貸出不可
    #[error("Book {0} is not available for loan")]
    BookUnavailable(BookId),

    /// 貸出が見つからない
    #[error("Loan {0} not found")]
    LoanNotFound(LoanId),

    /// 既に返却済みの貸出への返却操作
    #[error("Loan {0} is already returned")]
    LoanAlreadyReturned(LoanId),

    /// 外部サービス（カタログ）の呼び出し失敗・タイムアウト
    #[error("External service failure")]
    ExternalServiceFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 貸出リポジトリのエラー
    #[error("Loan repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, CirculationError>;
