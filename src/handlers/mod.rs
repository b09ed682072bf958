pub mod health_handlers;
pub mod user_handlers;

pub use health_handlers::health_handler;
pub use user_handlers::{
    create_user, delete_user, export_users_csv, get_user, list_users, update_user,
};
