//! DTOs for users_sea adapter.

/// Full replacement of a user row, keyed by email.
#[derive(Debug, Clone)]
pub struct UserUpsert {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: i32,
}

impl From<crate::repos::users::NewUser> for UserUpsert {
    fn from(user: crate::repos::users::NewUser) -> Self {
        Self {
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
        }
    }
}
