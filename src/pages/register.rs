use std::sync::Arc;
use std::time::Duration;

use super::{AppContext, LoadingFlag};
use crate::config::config;
use crate::error::ClientError;
use crate::lifecycle::Lifetime;
use crate::models::RegisterRequest;
use crate::navigation::Route;
use crate::popup::{popup, PopupProps, PopupView};

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required.";

/// Registration form. A successful submit opens the confirmation popup;
/// [`RegisterPage::complete_redirect`] then waits out the delay and returns
/// to the entry page.
pub struct RegisterPage {
    ctx: AppContext,
    username: String,
    email: String,
    password: String,
    error: Option<String>,
    loading: LoadingFlag,
    popup_open: bool,
    popup_message: String,
    redirect_pending: bool,
    redirect_delay: Duration,
    lifetime: Lifetime,
}

impl RegisterPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            error: None,
            loading: LoadingFlag::default(),
            popup_open: false,
            popup_message: String::new(),
            redirect_pending: false,
            redirect_delay: config().ui.register_redirect_delay(),
            lifetime: Lifetime::new(),
        }
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
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
            "Registering..."
        } else {
            "Register"
        }
    }

    pub fn is_popup_open(&self) -> bool {
        self.popup_open
    }

    pub fn redirect_pending(&self) -> bool {
        self.redirect_pending
    }

    /// The confirmation popup, wired to this page's close handler
    pub fn popup(&mut self) -> Option<PopupView<'_, impl FnOnce() + '_>> {
        let open = &mut self.popup_open;
        popup(PopupProps {
            is_open: *open,
            message: &self.popup_message,
            on_close: move || *open = false,
        })
    }

    /// Hides the popup; a pending redirect still happens.
    pub fn close_popup(&mut self) {
        self.popup_open = false;
    }

    /// Validates and registers. On success the popup opens and a redirect
    /// becomes pending; the caller drives it with
    /// [`RegisterPage::complete_redirect`], which this does not await.
    pub async fn submit(&mut self) -> Result<(), ClientError> {
        self.error = None;

        if self.username.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(self.fail(ClientError::validation(ALL_FIELDS_REQUIRED)));
        }

        let result = {
            let _loading = self.loading.begin();

            let request = RegisterRequest {
                username: self.username.clone(),
                email: self.email.clone(),
                password: self.password.clone(),
            };
            let auth = Arc::clone(&self.ctx.auth);

            self.lifetime
                .run(async move { auth.register(&request).await })
                .await
        };

        let message = match result {
            Ok(message) => message,
            Err(err) => return Err(self.fail(err)),
        };

        tracing::info!(username = %self.username, "registered");
        self.popup_message = message.unwrap_or_default();
        self.popup_open = true;
        self.redirect_pending = true;
        Ok(())
    }

    /// After a successful submit: wait the redirect delay, hide the popup and
    /// go to the entry page. Does nothing when no redirect is pending.
    pub async fn complete_redirect(&mut self) -> Result<(), ClientError> {
        if !self.redirect_pending {
            return Ok(());
        }

        let delay = self.redirect_delay;
        self.lifetime
            .run(async move {
                tokio::time::sleep(delay).await;
                Ok(())
            })
            .await?;

        self.popup_open = false;
        self.redirect_pending = false;
        self.ctx.navigator.navigate(Route::Entry);
        Ok(())
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        if !err.is_cancelled() {
            tracing::warn!(error = %err, "registration failed");
            self.error = Some(err.to_string());
        }
        err
    }
}

impl Drop for RegisterPage {
    fn drop(&mut self) {
        self.lifetime.end();
    }
}
