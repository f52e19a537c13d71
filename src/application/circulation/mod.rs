mod circulation_service;
mod errors;

pub use circulation_service::{
    BookLockRegistry, ServiceDependencies, close_loan, list_loans, open_loan,
};
pub use errors::{CirculationError, Result};
