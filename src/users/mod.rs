//! User use cases.
//!
//! Queries (`GetUser`, `FindUsers`, `ListUsers`) and commands (`CreateUser`,
//! `UpdateUser`, `DeleteUser`). Each request type declares its rules and
//! builds its own [`Pipeline`](crate::pipeline::Pipeline).

pub mod commands;
pub mod dto;
pub mod queries;
mod rules;

pub use commands::{CreateUser, DeleteUser, UpdateUser};
pub use dto::{PaginatedDto, UserDto};
pub use queries::{FindUsers, GetUser, ListUsers};
pub use rules::{TargetsUser, UserExistsRule};
