pub mod export;
pub mod user_service;
pub mod validation;

pub use export::CsvExport;
pub use user_service::{ListUsersQuery, UserService, UserServiceError};
pub use validation::{validate_user_input, FieldError};
