use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, CloseLoanError, LoanId, UserId};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// 貸出ステータス
///
/// 遷移は単調：Active → Returned のみ。逆方向の遷移はない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// 貸出中
    Active,
    /// 返却済み
    Returned,
}

impl LoanStatus {
    pub fn is_returned(&self) -> bool {
        matches!(self, LoanStatus::Returned)
    }

    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(LoanStatus::Active),
            "returned" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

/// Loan集約 - 1人の利用者への1冊の書籍の1回の貸出
///
/// 不変条件：
/// - `loaned_at <= due_date`
/// - `id`は作成後に変化しない
/// - 貸出は削除されない（貸出台帳として追記のみ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub loaned_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub status: LoanStatus,
}

/// 純粋関数：貸出を開始する
///
/// ビジネスルール：
/// - 貸出期間は14日間
/// - 状態はActive
///
/// 副作用なし。新しいLoanを返す。
pub fn open_loan(user_id: UserId, book_id: BookId, loaned_at: DateTime<Utc>) -> Loan {
    Loan {
        id: LoanId::generate(),
        user_id,
        book_id,
        loaned_at,
        due_date: loaned_at + Duration::days(LOAN_PERIOD_DAYS),
        status: LoanStatus::Active,
    }
}

/// 純粋関数：貸出を終了する
///
/// ビジネスルール：
/// - 既に返却済みの貸出は返却不可
///
/// 副作用なし。Returned状態の新しいLoanを返す。
pub fn close_loan(loan: &Loan) -> Result<Loan, CloseLoanError> {
    if loan.status.is_returned() {
        return Err(CloseLoanError::AlreadyReturned);
    }

    Ok(Loan {
        status: LoanStatus::Returned,
        ..loan.clone()
    })
}
