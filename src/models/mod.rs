mod user;

pub use user::{ContactDetail, NewUser, User};
