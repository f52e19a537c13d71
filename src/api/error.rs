use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::circulation::CirculationError;
use crate::domain::errors::IdError;

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    /// リクエスト不正（識別子が空など）
    InvalidRequest(&'static str),
    /// アプリケーション層のエラー
    Circulation(CirculationError),
}

impl From<CirculationError> for ApiError {
    fn from(err: CirculationError) -> Self {
        ApiError::Circulation(err)
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        match err {
            IdError::Empty => ApiError::InvalidRequest("identifier must not be empty"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 400 Bad Request - リクエストの形式不正
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.to_string())
            }

            ApiError::Circulation(err) => match err {
                // 404 Not Found - リクエストされた貸出が存在しない
                CirculationError::LoanNotFound(_) => {
                    (StatusCode::NOT_FOUND, "LOAN_NOT_FOUND", err.to_string())
                }

                // 422 Unprocessable Entity - ビジネスルール違反
                CirculationError::BookUnavailable(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "BOOK_UNAVAILABLE",
                    err.to_string(),
                ),
                CirculationError::LoanAlreadyReturned(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "LOAN_ALREADY_RETURNED",
                    err.to_string(),
                ),

                // 502 Bad Gateway - 上流サービス障害
                // 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                CirculationError::ExternalServiceFailure(ref e) => {
                    tracing::error!("External service failure: {}", e);
                    (
                        StatusCode::BAD_GATEWAY,
                        "EXTERNAL_SERVICE_FAILURE",
                        "Upstream service failure".to_string(),
                    )
                }

                // 500 Internal Server Error - 永続化障害
                CirculationError::RepositoryError(ref e) => {
                    tracing::error!("Loan repository error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "REPOSITORY_ERROR",
                        "Failed to access loan records".to_string(),
                    )
                }
            },
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
