use crate::domain::loan::{Loan, LoanStatus};
use crate::domain::value_objects::{BookId, LoanId, UserId};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;

fn invalid_data(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// PostgreSQLの行データをLoanに変換する
///
/// 識別子の空チェックとステータスの文字列変換でエラーハンドリングを行う。
/// どちらの不正もデータベース側の破損を意味する。
fn map_row_to_loan(row: &PgRow) -> Result<Loan> {
    let loan_id: String = row.get("loan_id");
    let user_id: String = row.get("user_id");
    let book_id: String = row.get("book_id");
    let status_str: &str = row.get("status");

    let status = LoanStatus::from_str(status_str).map_err(invalid_data)?;

    Ok(Loan {
        id: LoanId::new(loan_id).map_err(|_| invalid_data("empty loan_id".to_string()))?,
        user_id: UserId::new(user_id).map_err(|_| invalid_data("empty user_id".to_string()))?,
        book_id: BookId::new(book_id).map_err(|_| invalid_data("empty book_id".to_string()))?,
        loaned_at: row.get("loaned_at"),
        due_date: row.get("due_date"),
        status,
    })
}

/// LoanRepositoryのPostgreSQL実装
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// PostgreSQLコネクションプールから新しいLoanRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    /// 貸出を保存する（upsert）
    ///
    /// INSERT ... ON CONFLICT UPDATEで新規作成と返却時の更新を兼ねる。
    /// 作成後に変化するのはstatusのみ（識別子と日付は不変）。
    async fn save(&self, loan: Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (
                loan_id,
                user_id,
                book_id,
                loaned_at,
                due_date,
                status
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (loan_id)
            DO UPDATE SET
                status = EXCLUDED.status
            "#,
        )
        .bind(loan.id.value())
        .bind(loan.user_id.value())
        .bind(loan.book_id.value())
        .bind(loan.loaned_at)
        .bind(loan.due_date)
        .bind(loan.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// IDで貸出を取得
    async fn find_by_id(&self, loan_id: &LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT
                loan_id,
                user_id,
                book_id,
                loaned_at,
                due_date,
                status
            FROM loans
            WHERE loan_id = $1
            "#,
        )
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    /// すべての貸出を貸出日の新しい順で取得
    async fn find_all(&self) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT
                loan_id,
                user_id,
                book_id,
                loaned_at,
                due_date,
                status
            FROM loans
            ORDER BY loaned_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }
}
