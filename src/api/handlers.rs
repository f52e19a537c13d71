use crate::application::circulation::{
    CirculationError, ServiceDependencies, close_loan as execute_close_loan,
    list_loans as execute_list_loans, open_loan as execute_open_loan,
};
use crate::domain::commands::CloseLoan;
use crate::domain::value_objects::LoanId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{LoanClosedResponse, LoanOpenedResponse, LoanResponse, OpenLoanRequest},
};

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// POST /loans - 新しい貸出を作成
///
/// 利用者への書籍の貸出を作成する。
///
/// 強制されるビジネスルール:
/// - 書籍がカタログ上で貸出可能であること
pub async fn open_loan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OpenLoanRequest>,
) -> Result<(StatusCode, Json<LoanOpenedResponse>), ApiError> {
    let cmd = req.to_command()?;

    let loan_id = execute_open_loan(&state.service_deps, cmd).await?;

    // 作成された貸出を取得して完全な情報を返す
    let loan = state
        .service_deps
        .loan_repository
        .find_by_id(&loan_id)
        .await
        .map_err(|e| ApiError::from(CirculationError::RepositoryError(e)))?
        .ok_or_else(|| ApiError::from(CirculationError::LoanNotFound(loan_id.clone())))?;

    let response = LoanOpenedResponse {
        loan_id: loan.id.value().to_string(),
        user_id: loan.user_id.value().to_string(),
        book_id: loan.book_id.value().to_string(),
        loaned_at: loan.loaned_at,
        due_date: loan.due_date,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /loans/:id/return - 書籍を返却
///
/// 貸出中の書籍の返却を処理する。
///
/// 強制されるビジネスルール:
/// - 貸出が存在すること
/// - 既に返却済みでないこと
pub async fn close_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<String>,
) -> Result<(StatusCode, Json<LoanClosedResponse>), ApiError> {
    let loan_id = LoanId::new(loan_id)?;

    let cmd = CloseLoan {
        loan_id: loan_id.clone(),
    };

    execute_close_loan(&state.service_deps, cmd).await?;

    // 更新された貸出を取得して返却を確認
    let loan = state
        .service_deps
        .loan_repository
        .find_by_id(&loan_id)
        .await
        .map_err(|e| ApiError::from(CirculationError::RepositoryError(e)))?
        .ok_or_else(|| ApiError::from(CirculationError::LoanNotFound(loan_id.clone())))?;

    let response = LoanClosedResponse {
        loan_id: loan.id.value().to_string(),
        status: loan.status.as_str().to_string(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// GET /loans - 全貸出一覧取得
///
/// フィルタリング・ページングなしで全件を返す。
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = execute_list_loans(&state.service_deps).await?;

    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}
