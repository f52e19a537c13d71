use circulation_service::{
    adapters::mock::{
        catalog::CatalogService as MockCatalogService,
        notifications::NotificationService as MockNotificationService,
    },
    adapters::postgres::loan_repository::LoanRepository as PostgresLoanRepository,
    api::{handlers::AppState, router::create_router},
    application::circulation::{BookLockRegistry, ServiceDependencies},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "circulation_service=debug,tower_http=debug,axum=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/circulation".into());

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // Initialize adapters
    // The catalog and notification collaborators are external systems; the
    // mock adapters stand in for their real clients here.
    let loan_repository = Arc::new(PostgresLoanRepository::new(pool.clone()));
    let catalog = Arc::new(MockCatalogService::new());
    let notifications = Arc::new(MockNotificationService::new());

    // Create service dependencies
    let service_deps = ServiceDependencies {
        loan_repository,
        catalog,
        notifications,
        book_locks: Arc::new(BookLockRegistry::new()),
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
