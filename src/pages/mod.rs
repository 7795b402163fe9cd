//! Page controllers: the state behind each screen and the actions the
//! screen's controls trigger.

pub mod dashboard;
pub mod login;
pub mod register;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::{ApiClient, AuthApi, UserApi};
use crate::navigation::Navigator;
use crate::session::SessionStore;

pub use dashboard::{DashboardPage, FormMode, MountOutcome};
pub use login::LoginPage;
pub use register::RegisterPage;

/// Collaborators shared by every page.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthApi>,
    pub users: Arc<dyn UserApi>,
    pub session: Arc<dyn SessionStore>,
    pub navigator: Arc<dyn Navigator>,
}

impl AppContext {
    pub fn new(
        auth: Arc<dyn AuthApi>,
        users: Arc<dyn UserApi>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            auth,
            users,
            session,
            navigator,
        }
    }

    /// One client serving both the auth and the user endpoints
    pub fn with_client(
        client: ApiClient,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client, session, navigator)
    }
}

/// Busy flag behind a form's submit control. Readable from outside the page
/// while a request is in flight.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `None` when already loading. The flag drops back when the guard does,
    /// whichever way the request ends.
    pub(crate) fn begin(&self) -> Option<LoadingGuard> {
        if self.0.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(LoadingGuard(self.clone()))
    }
}

#[derive(Debug)]
pub(crate) struct LoadingGuard(LoadingFlag);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        (self.0).0.store(false, Ordering::SeqCst);
    }
}
