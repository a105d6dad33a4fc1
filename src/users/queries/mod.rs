pub mod find_users;
pub mod get_user;
pub mod list_users;

pub use find_users::{FindUsers, FindUsersHandler};
pub use get_user::{GetUser, GetUserHandler};
pub use list_users::{ListUsers, ListUsersHandler};
