use axum::body::Body;
use axum::http::{Request, StatusCode};
use circulation_service::adapters::mock::{CatalogService, LoanRepository, NotificationService};
use circulation_service::api::handlers::AppState;
use circulation_service::api::router::create_router;
use circulation_service::api::types::*;
use circulation_service::application::circulation::{BookLockRegistry, ServiceDependencies};
use circulation_service::domain::value_objects::BookId;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// APIテスト用のヘルパー関数
// ============================================================================

/// APIテスト用のアプリケーションセットアップ
///
/// インメモリのリポジトリとモックの外部協力者で実際のAPIルーターを組み立てる。
fn setup_app(available_books: &[&str]) -> axum::Router {
    let catalog = Arc::new(CatalogService::new());
    for book_id in available_books {
        catalog.add_available_book(BookId::new(*book_id).unwrap());
    }

    let service_deps = ServiceDependencies {
        loan_repository: Arc::new(LoanRepository::new()),
        catalog,
        notifications: Arc::new(NotificationService::new()),
        book_locks: Arc::new(BookLockRegistry::new()),
    };

    let app_state = Arc::new(AppState { service_deps });

    create_router(app_state)
}

async fn post_json(app: &axum::Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_empty(app: &axum::Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &axum::Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn read_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ============================================================================
// APIテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_api_full_loan_flow() {
    let app = setup_app(&["b1"]);

    // Step 1: 貸出作成（POST /loans）
    let response = post_json(
        &app,
        "/loans",
        json!({"user_id": "u1", "book_id": "b1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let opened: LoanOpenedResponse = read_body(response).await;
    assert_eq!(opened.user_id, "u1");
    assert_eq!(opened.book_id, "b1");
    assert!(opened.loaned_at <= opened.due_date);

    // Step 2: 貸出一覧取得（GET /loans）
    let response = get(&app, "/loans").await;
    assert_eq!(response.status(), StatusCode::OK);

    let loans: Vec<LoanResponse> = read_body(response).await;
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].loan_id, opened.loan_id);
    assert_eq!(loans[0].status, "active");

    // Step 3: 返却（POST /loans/:id/return）
    let response = post_empty(&app, &format!("/loans/{}/return", opened.loan_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let closed: LoanClosedResponse = read_body(response).await;
    assert_eq!(closed.loan_id, opened.loan_id);
    assert_eq!(closed.status, "returned");

    // Step 4: 返却後の一覧で状態を確認
    let response = get(&app, "/loans").await;
    let loans: Vec<LoanResponse> = read_body(response).await;
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].status, "returned");
}

#[tokio::test]
async fn test_api_health_check() {
    let app = setup_app(&[]);

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// APIテスト: 異常系
// ============================================================================

#[tokio::test]
async fn test_api_open_loan_rejects_unavailable_book() {
    // カタログに登録されていない書籍は貸出不可
    let app = setup_app(&[]);

    let response = post_json(
        &app,
        "/loans",
        json!({"user_id": "u1", "book_id": "b1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: ErrorResponse = read_body(response).await;
    assert_eq!(error.error, "BOOK_UNAVAILABLE");
}

#[tokio::test]
async fn test_api_open_loan_rejects_empty_identifier() {
    let app = setup_app(&["b1"]);

    let response = post_json(
        &app,
        "/loans",
        json!({"user_id": "", "book_id": "b1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = read_body(response).await;
    assert_eq!(error.error, "INVALID_REQUEST");
}

#[tokio::test]
async fn test_api_return_unknown_loan_returns_not_found() {
    let app = setup_app(&[]);

    let response = post_empty(&app, "/loans/unknown-loan/return").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error: ErrorResponse = read_body(response).await;
    assert_eq!(error.error, "LOAN_NOT_FOUND");
}

#[tokio::test]
async fn test_api_double_return_is_rejected() {
    let app = setup_app(&["b1"]);

    let response = post_json(
        &app,
        "/loans",
        json!({"user_id": "u1", "book_id": "b1"}),
    )
    .await;
    let opened: LoanOpenedResponse = read_body(response).await;

    let uri = format!("/loans/{}/return", opened.loan_id);
    let response = post_empty(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    // 2回目の返却はビジネスルール違反として拒否される
    let response = post_empty(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: ErrorResponse = read_body(response).await;
    assert_eq!(error.error, "LOAN_ALREADY_RETURNED");
}
