use serde::{Deserialize, Serialize};

/// A stored user. `id` is assigned by the repository and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub given_names: String,
    pub last_name: String,
    pub contact_detail: ContactDetail,
}

/// Contact information owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetail {
    pub email_address: String,
    pub mobile_number: String,
}

/// User data for inserting new records; the repository assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub given_names: String,
    pub last_name: String,
    pub contact_detail: ContactDetail,
}

impl NewUser {
    pub(crate) fn into_user(self, id: i32) -> User {
        User {
            id,
            given_names: self.given_names,
            last_name: self.last_name,
            contact_detail: self.contact_detail,
        }
    }
}
