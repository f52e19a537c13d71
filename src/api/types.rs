use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::commands::OpenLoan;
use crate::domain::errors::IdError;
use crate::domain::loan::Loan;
use crate::domain::value_objects::{BookId, UserId};

/// 貸出作成リクエスト（POST /loans）
#[derive(Debug, Clone, Deserialize)]
pub struct OpenLoanRequest {
    pub user_id: String,
    pub book_id: String,
}

impl OpenLoanRequest {
    /// リクエストをコマンドへ変換する
    ///
    /// 識別子の空チェックはここで行う。貸出日時は受信時刻。
    pub fn to_command(&self) -> Result<OpenLoan, IdError> {
        Ok(OpenLoan {
            user_id: UserId::new(self.user_id.as_str())?,
            book_id: BookId::new(self.book_id.as_str())?,
            loaned_at: Utc::now(),
        })
    }
}

/// 貸出作成レスポンス（POST /loans）
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanOpenedResponse {
    pub loan_id: String,
    pub user_id: String,
    pub book_id: String,
    pub loaned_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// 返却レスポンス（POST /loans/:id/return）
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanClosedResponse {
    pub loan_id: String,
    pub status: String,
}

/// 貸出レスポンス（GET /loans）
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub loan_id: String,
    pub user_id: String,
    pub book_id: String,
    pub loaned_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub status: String,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            loan_id: loan.id.value().to_string(),
            user_id: loan.user_id.value().to_string(),
            book_id: loan.book_id.value().to_string(),
            loaned_at: loan.loaned_at,
            due_date: loan.due_date,
            status: loan.status.as_str().to_string(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
