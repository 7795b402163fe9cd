use std::sync::Arc;

use super::AppContext;
use crate::error::ClientError;
use crate::lifecycle::Lifetime;
use crate::models::{User, UserDraft};
use crate::navigation::Route;

/// What the user form's submit control does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Creating,
    Editing(User),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// The user list was fetched (or the fetch failed with an error set)
    Ready,
    /// No session; navigation to the entry page already happened
    Unauthenticated,
}

/// User registry view, kept in step with the server one action at a time.
///
/// Local state only ever changes from a successful server response; nothing
/// is applied optimistically, so a failed action never needs rolling back.
pub struct DashboardPage {
    ctx: AppContext,
    users: Vec<User>,
    draft: UserDraft,
    mode: FormMode,
    error: Option<String>,
    lifetime: Lifetime,
}

impl DashboardPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            users: Vec::new(),
            draft: UserDraft::default(),
            mode: FormMode::Creating,
            error: None,
            lifetime: Lifetime::new(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Editing(_))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime.clone()
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Creating => "Add User",
            FormMode::Editing(_) => "Update User",
        }
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.draft.username = username.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.draft.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.draft.password = password.into();
    }

    /// Session gate plus initial fetch. Without a token this navigates to the
    /// entry page and issues no request.
    pub async fn mount(&mut self) -> Result<MountOutcome, ClientError> {
        let Some(token) = self.session_token()? else {
            tracing::debug!("no session, redirecting to entry");
            self.ctx.navigator.navigate(Route::Entry);
            return Ok(MountOutcome::Unauthenticated);
        };

        self.error = None;
        let api = Arc::clone(&self.ctx.users);
        let result = self
            .lifetime
            .run(async move { api.list_users(&token).await })
            .await;

        match result {
            Ok(users) => {
                tracing::debug!(count = users.len(), "fetched users");
                self.users = users;
                Ok(MountOutcome::Ready)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// The form's submit control: create or update depending on the mode.
    pub async fn submit(&mut self) -> Result<(), ClientError> {
        match self.mode {
            FormMode::Creating => self.add_user().await,
            FormMode::Editing(_) => self.update_user().await,
        }
    }

    pub async fn add_user(&mut self) -> Result<(), ClientError> {
        let Some(token) = self.session_token()? else {
            return Ok(());
        };

        self.error = None;
        let new_user = self.draft.to_new_user();
        let api = Arc::clone(&self.ctx.users);
        let result = self
            .lifetime
            .run(async move { api.create_user(&token, &new_user).await })
            .await;

        match result {
            Ok(user) => {
                tracing::info!(id = user.id, "user added");
                self.users.push(user);
                self.draft.clear();
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// The row's "Edit" control: switch to editing and pre-fill the draft.
    pub fn begin_edit(&mut self, user: &User) {
        self.draft = UserDraft::from_user(user);
        self.mode = FormMode::Editing(user.clone());
    }

    /// `begin_edit` for the listed user with `id`; false when not listed.
    pub fn begin_edit_by_id(&mut self, id: i64) -> bool {
        match self.users.iter().find(|u| u.id == id).cloned() {
            Some(user) => {
                self.begin_edit(&user);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.draft.clear();
        self.mode = FormMode::Creating;
    }

    pub async fn update_user(&mut self) -> Result<(), ClientError> {
        let FormMode::Editing(target) = &self.mode else {
            return Ok(());
        };
        let target = target.clone();

        let Some(token) = self.session_token()? else {
            return Ok(());
        };

        self.error = None;
        let update = self.draft.to_update(&target);
        let api = Arc::clone(&self.ctx.users);
        let result = self
            .lifetime
            .run(async move { api.update_user(&token, target.id, &update).await })
            .await;

        match result {
            Ok(updated) => {
                tracing::info!(id = updated.id, "user updated");
                for user in self.users.iter_mut().filter(|u| u.id == updated.id) {
                    *user = updated.clone();
                }
                self.draft.clear();
                self.mode = FormMode::Creating;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub async fn delete_user(&mut self, id: i64) -> Result<(), ClientError> {
        let Some(token) = self.session_token()? else {
            return Ok(());
        };

        self.error = None;
        let api = Arc::clone(&self.ctx.users);
        let result = self
            .lifetime
            .run(async move { api.delete_user(&token, id).await })
            .await;

        match result {
            Ok(()) => {
                tracing::info!(id, "user deleted");
                self.users.retain(|u| u.id != id);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Forget the session and go to the entry page. No server call.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        if let Err(err) = self.ctx.session.clear_token() {
            return Err(self.fail(err.into()));
        }
        self.ctx.navigator.navigate(Route::Entry);
        Ok(())
    }

    fn session_token(&mut self) -> Result<Option<String>, ClientError> {
        self.ctx
            .session
            .get_token()
            .map_err(|err| self.fail(err.into()))
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        if !err.is_cancelled() {
            tracing::warn!(error = %err, "dashboard action failed");
            self.error = Some(err.to_string());
        }
        err
    }
}

impl Drop for DashboardPage {
    fn drop(&mut self) {
        self.lifetime.end();
    }
}
