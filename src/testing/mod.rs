use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::api::{AuthApi, UserApi};
use crate::error::ClientError;
use crate::models::{AccessToken, LoginRequest, NewUser, RegisterRequest, User, UserUpdate};
use crate::navigation::HistoryNavigator;
use crate::pages::{AppContext, LoadingFlag};
use crate::session::MemorySessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Login,
    Register,
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(LoginRequest),
    Register(RegisterRequest),
    List { token: String },
    Create { token: String, user: NewUser },
    Update { token: String, id: i64, update: UserUpdate },
    Delete { token: String, id: i64 },
}

#[derive(Debug, Default)]
struct FakeState {
    users: Vec<User>,
    next_id: i64,
    login_token: Option<String>,
    register_message: Option<String>,
    failures: HashMap<Op, (u16, String)>,
    hanging: Vec<Op>,
    calls: Vec<Call>,
    watched: Option<LoadingFlag>,
    loading_seen: Vec<bool>,
}

/// In-process stand-in for the admin backend with failure injection and a
/// log of every call it received.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.state().next_id = 1;
        backend
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        {
            let mut state = self.state();
            state.next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            state.users = users;
        }
        self
    }

    pub fn with_login_token(self, token: Option<&str>) -> Self {
        self.state().login_token = token.map(str::to_string);
        self
    }

    pub fn with_register_message(self, message: Option<&str>) -> Self {
        self.state().register_message = message.map(str::to_string);
        self
    }

    /// Every subsequent call of `op` fails with `status` and `message`
    pub fn fail(&self, op: Op, status: u16, message: &str) {
        self.state().failures.insert(op, (status, message.to_string()));
    }

    /// Calls of `op` never resolve
    pub fn hang(&self, op: Op) {
        self.state().hanging.push(op);
    }

    /// Record the state of `flag` each time a call arrives
    pub fn watch_loading(&self, flag: LoadingFlag) {
        self.state().watched = Some(flag);
    }

    pub fn loading_seen(&self) -> Vec<bool> {
        self.state().loading_seen.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn server_users(&self) -> Vec<User> {
        self.state().users.clone()
    }

    async fn enter(&self, op: Op, call: Call) -> Result<(), ClientError> {
        let hanging = {
            let mut state = self.state();
            let seen = state.watched.as_ref().map(LoadingFlag::is_set);
            if let Some(seen) = seen {
                state.loading_seen.push(seen);
            }
            state.calls.push(call);
            state.hanging.contains(&op)
        };

        if hanging {
            futures::future::pending::<()>().await;
        }

        match self.state().failures.get(&op) {
            Some((status, message)) => Err(ClientError::api(*status, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AccessToken, ClientError> {
        self.enter(Op::Login, Call::Login(request.clone())).await?;
        Ok(AccessToken {
            access_token: self.state().login_token.clone(),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ClientError> {
        self.enter(Op::Register, Call::Register(request.clone())).await?;
        Ok(self.state().register_message.clone())
    }
}

#[async_trait]
impl UserApi for FakeBackend {
    async fn list_users(&self, token: &str) -> Result<Vec<User>, ClientError> {
        self.enter(Op::List, Call::List { token: token.to_string() }).await?;
        Ok(self.state().users.clone())
    }

    async fn create_user(&self, token: &str, user: &NewUser) -> Result<User, ClientError> {
        self.enter(
            Op::Create,
            Call::Create {
                token: token.to_string(),
                user: user.clone(),
            },
        )
        .await?;

        let mut state = self.state();
        let created = User {
            id: state.next_id,
            username: user.username.clone(),
            email: user.email.clone(),
        };
        state.next_id += 1;
        state.users.push(created.clone());
        Ok(created)
    }

    async fn update_user(
        &self,
        token: &str,
        id: i64,
        update: &UserUpdate,
    ) -> Result<User, ClientError> {
        self.enter(
            Op::Update,
            Call::Update {
                token: token.to_string(),
                id,
                update: update.clone(),
            },
        )
        .await?;

        let mut state = self.state();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| ClientError::api(404, "User not found"))?;
        user.username = update.username.clone();
        user.email = update.email.clone();
        Ok(user.clone())
    }

    async fn delete_user(&self, token: &str, id: i64) -> Result<(), ClientError> {
        self.enter(
            Op::Delete,
            Call::Delete {
                token: token.to_string(),
                id,
            },
        )
        .await?;

        let mut state = self.state();
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Err(ClientError::api(404, "User not found"));
        }
        Ok(())
    }
}

pub fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
    }
}

/// Wires a fake backend, a memory session and a history navigator together
pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub session: MemorySessionStore,
    pub navigator: Arc<HistoryNavigator>,
}

impl Harness {
    pub fn new(backend: FakeBackend, session: MemorySessionStore) -> Self {
        Self {
            backend: Arc::new(backend),
            session,
            navigator: Arc::new(HistoryNavigator::new()),
        }
    }

    pub fn context(&self) -> AppContext {
        AppContext::new(
            self.backend.clone(),
            self.backend.clone(),
            Arc::new(self.session.clone()),
            self.navigator.clone(),
        )
    }
}
