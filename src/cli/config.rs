use std::sync::Arc;

use anyhow::Context;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::navigation::{HistoryNavigator, Route};
use crate::pages::AppContext;
use crate::session::FileSessionStore;

/// Everything a command needs: the page context plus direct handles on the
/// concrete session store and navigator so results can be reported.
pub struct ConsoleEnv {
    pub context: AppContext,
    pub session: Arc<FileSessionStore>,
    pub navigator: Arc<HistoryNavigator>,
}

impl ConsoleEnv {
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = ApiClient::from_config(&config.api)
            .with_context(|| format!("invalid API configuration for {}", config.api.base_url))?;
        let session = Arc::new(
            FileSessionStore::from_config(&config.session)
                .context("failed to locate session storage")?,
        );
        let navigator = Arc::new(HistoryNavigator::new());

        tracing::debug!(
            base_url = %client.base_url(),
            storage = %session.path().display(),
            "console environment ready"
        );

        let context = AppContext::with_client(client, session.clone(), navigator.clone());
        Ok(Self {
            context,
            session,
            navigator,
        })
    }

    pub fn landed_on(&self, route: Route) -> bool {
        self.navigator.current() == Some(route)
    }
}
