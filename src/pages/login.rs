use std::sync::Arc;

use super::{AppContext, LoadingFlag};
use crate::error::ClientError;
use crate::lifecycle::Lifetime;
use crate::models::LoginRequest;
use crate::navigation::Route;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields.";
pub const TOKEN_NOT_PROVIDED: &str = "Token not provided.";

/// Login form: credentials in, token stored, dashboard out.
pub struct LoginPage {
    ctx: AppContext,
    username: String,
    password: String,
    error: Option<String>,
    loading: LoadingFlag,
    lifetime: Lifetime,
}

impl LoginPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            username: String::new(),
            password: String::new(),
            error: None,
            loading: LoadingFlag::default(),
            lifetime: Lifetime::new(),
        }
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime.clone()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_loading() {
            "Logging in..."
        } else {
            "Login"
        }
    }

    /// The "Don't have an account?" control
    pub fn go_to_register(&self) {
        self.ctx.navigator.navigate(Route::Register);
    }

    pub async fn submit(&mut self) -> Result<(), ClientError> {
        self.error = None;

        if self.username.is_empty() || self.password.is_empty() {
            return Err(self.fail(ClientError::validation(FILL_ALL_FIELDS)));
        }

        let _loading = self.loading.begin();

        let request = LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        let auth = Arc::clone(&self.ctx.auth);

        let result = self
            .lifetime
            .run(async move {
                let payload = auth.login(&request).await?;
                payload
                    .access_token
                    .filter(|token| !token.is_empty())
                    .ok_or_else(|| ClientError::contract(TOKEN_NOT_PROVIDED))
            })
            .await;

        let token = match result {
            Ok(token) => token,
            Err(err) => return Err(self.fail(err)),
        };

        if let Err(err) = self.ctx.session.set_token(&token) {
            return Err(self.fail(err.into()));
        }

        tracing::info!(username = %self.username, "logged in");
        self.ctx.navigator.navigate(Route::Dashboard);
        Ok(())
    }

    /// Records `err` as the page's error, except for cancellation which must
    /// leave a torn-down page untouched.
    fn fail(&mut self, err: ClientError) -> ClientError {
        if !err.is_cancelled() {
            tracing::warn!(error = %err, "login failed");
            self.error = Some(err.to_string());
        }
        err
    }
}

impl Drop for LoginPage {
    fn drop(&mut self) {
        self.lifetime.end();
    }
}
