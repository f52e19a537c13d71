use crate::domain::loan::Loan;
use crate::domain::value_objects::LoanId;
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// インメモリLoanRepository実装
///
/// ローカル起動とテストの配線に使用する。
pub struct LoanRepository {
    loans: Mutex<HashMap<LoanId, Loan>>,
}

impl LoanRepository {
    pub fn new() -> Self {
        Self {
            loans: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for LoanRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn save(&self, loan: Loan) -> Result<()> {
        self.loans.lock().unwrap().insert(loan.id.clone(), loan);
        Ok(())
    }

    async fn find_by_id(&self, loan_id: &LoanId) -> Result<Option<Loan>> {
        Ok(self.loans.lock().unwrap().get(loan_id).cloned())
    }

    /// 貸出日の新しい順で全件を返す
    async fn find_all(&self) -> Result<Vec<Loan>> {
        let mut loans: Vec<Loan> = self.loans.lock().unwrap().values().cloned().collect();
        loans.sort_by(|a, b| b.loaned_at.cmp(&a.loaned_at));
        Ok(loans)
    }
}
