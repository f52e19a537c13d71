pub mod catalog;
pub mod loan_repository;
pub mod notifications;

pub use catalog::CatalogService;
pub use loan_repository::LoanRepository;
pub use notifications::NotificationService;
