//! Outbound calls to the admin REST backend.
//!
//! Pages depend on the [`AuthApi`] and [`UserApi`] traits; [`ApiClient`] is
//! the reqwest implementation of both.

pub mod client;
pub mod envelope;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::models::{AccessToken, LoginRequest, NewUser, RegisterRequest, User, UserUpdate};

pub use client::ApiClient;
pub use envelope::Envelope;

/// Call-site fallback messages used when an error body carries no `message`.
pub mod fallback {
    pub const LOGIN_FAILED: &str = "Failed to log in. Please check your credentials.";
    pub const REGISTER_FAILED: &str = "Registration failed.";
    pub const FETCH_USERS_FAILED: &str = "Failed to fetch users.";
    pub const ADD_USER_FAILED: &str = "Failed to add user.";
    pub const UPDATE_USER_FAILED: &str = "Failed to update user.";
    pub const DELETE_USER_FAILED: &str = "Failed to delete user.";
}

pub const LOGIN_PATH: &str = "api/v1/auth/login";
pub const REGISTER_PATH: &str = "api/v1/auth/register";
pub const USERS_PATH: &str = "api/v1/admin/user";

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Returns the `data` payload of the login envelope. A missing token is
    /// not an error at this layer; the login page decides.
    async fn login(&self, request: &LoginRequest) -> Result<AccessToken, ClientError>;

    /// Returns the server's confirmation message, if any
    async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ClientError>;
}

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn list_users(&self, token: &str) -> Result<Vec<User>, ClientError>;

    async fn create_user(&self, token: &str, user: &NewUser) -> Result<User, ClientError>;

    async fn update_user(
        &self,
        token: &str,
        id: i64,
        update: &UserUpdate,
    ) -> Result<User, ClientError>;

    async fn delete_user(&self, token: &str, id: i64) -> Result<(), ClientError>;
}
