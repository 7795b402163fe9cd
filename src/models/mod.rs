pub mod auth;
pub mod user;

pub use auth::{AccessToken, LoginRequest, RegisterRequest};
pub use user::{NewUser, User, UserDraft, UserUpdate};
