pub mod catalog;
pub mod loan_repository;
pub mod notifications;

pub use catalog::*;
pub use loan_repository::*;
pub use notifications::*;
