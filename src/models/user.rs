use serde::{Deserialize, Serialize};

/// User record as returned by the admin endpoints. The password never
/// comes back from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Unsaved form state, shared by the create form and the edit buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/v1/admin/user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `PUT /api/v1/admin/user/{id}`; a missing password means unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserDraft {
    /// Edit buffer for `user`; the password starts blank
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    /// Merge the draft over `target` and build the update body.
    pub fn to_update(&self, target: &User) -> UserUpdate {
        let merged = User {
            id: target.id,
            username: self.username.clone(),
            email: self.email.clone(),
        };

        UserUpdate {
            username: merged.username,
            email: merged.email,
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        }
    }
}
