pub mod create_user;
pub mod delete_user;
pub mod update_user;

pub use create_user::{CreateUser, CreateUserHandler};
pub use delete_user::{DeleteUser, DeleteUserHandler};
pub use update_user::{UpdateUser, UpdateUserHandler};
