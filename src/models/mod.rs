pub mod pagination;
pub mod user;

pub use pagination::{PageRequest, Pagination, UserPage, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use user::{NewUser, User, UserFilter, UserInput};
