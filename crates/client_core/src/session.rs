use std::sync::Arc;

use shared::domain::{LoginCredentials, ProfileUpdate, Registration, UserProfile};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    error::{ClientError, ClientResult},
    persistence::Persistence,
    transport::{Transport, TransportResult},
};

const LOGIN_FAILED: &str = "Login failed";
const REGISTER_FAILED: &str = "Register failed";
const UPDATE_FAILED: &str = "Update profile failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Unknown,
    Bootstrapping,
    Authenticating,
    Updating,
    Authenticated,
    Anonymous,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    /// Set once the first bootstrap attempt settles; never cleared afterwards.
    pub is_initialized: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: SessionPhase,
}

impl SessionState {
    fn settled_phase(&self) -> SessionPhase {
        if self.is_authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionCommand {
    Bootstrap,
    Login(LoginCredentials),
    Register(Registration),
    UpdateProfile(ProfileUpdate),
    Logout,
}

pub struct SessionStore {
    transport: Arc<dyn Transport>,
    persistence: Persistence,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(transport: Arc<dyn Transport>, persistence: Persistence) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            transport,
            persistence,
            state,
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub async fn apply(&self, command: SessionCommand) -> ClientResult<()> {
        match command {
            SessionCommand::Bootstrap => {
                self.bootstrap().await;
                Ok(())
            }
            SessionCommand::Login(credentials) => self.login(&credentials).await.map(|_| ()),
            SessionCommand::Register(registration) => {
                self.register(&registration).await.map(|_| ())
            }
            SessionCommand::UpdateProfile(fields) => {
                self.update_profile(&fields).await.map(|_| ())
            }
            SessionCommand::Logout => {
                self.logout().await;
                Ok(())
            }
        }
    }

    /// Restores the session from the persisted token.
    ///
    /// Always settles with `is_initialized = true`, falling back to anonymous on
    /// any failure. A 401 additionally drops the persisted token.
    pub async fn bootstrap(&self) -> SessionPhase {
        self.state.send_modify(|s| {
            s.phase = SessionPhase::Bootstrapping;
            s.loading = true;
            s.error = None;
        });

        let Some(token) = self.persistence.token().await else {
            info!("no persisted session token; continuing anonymously");
            self.settle_anonymous();
            return SessionPhase::Anonymous;
        };

        match self.transport.get_current_user(&token).await {
            Ok(user) => {
                let token = if user.token.is_empty() {
                    token
                } else {
                    user.token.clone()
                };
                info!(username = %user.username, "session restored");
                self.state.send_modify(|s| {
                    s.user = Some(user);
                    s.token = Some(token);
                    s.is_authenticated = true;
                    s.is_initialized = true;
                    s.loading = false;
                    s.phase = SessionPhase::Authenticated;
                });
                SessionPhase::Authenticated
            }
            Err(err) if err.is_unauthorized() => {
                warn!("persisted session token was rejected; clearing it");
                self.persistence.clear_token().await;
                self.settle_anonymous();
                SessionPhase::Anonymous
            }
            Err(err) => {
                warn!(status = ?err.status, "failed to restore session: {err}");
                self.settle_anonymous();
                SessionPhase::Anonymous
            }
        }
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<UserProfile> {
        self.begin(SessionPhase::Authenticating);
        let result = self.transport.login_user(credentials).await;
        self.finish_sign_in(result, LOGIN_FAILED).await
    }

    pub async fn register(&self, registration: &Registration) -> ClientResult<UserProfile> {
        self.begin(SessionPhase::Authenticating);
        let result = self.transport.register_user(registration).await;
        self.finish_sign_in(result, REGISTER_FAILED).await
    }

    pub async fn update_profile(&self, fields: &ProfileUpdate) -> ClientResult<UserProfile> {
        let Some(token) = self.token() else {
            let err = ClientError::Unauthenticated;
            self.state.send_modify(|s| s.error = Some(err.to_string()));
            return Err(err);
        };

        self.begin(SessionPhase::Updating);
        let result = self.transport.update_user(fields, &token).await;

        match result {
            Ok(user) => {
                let mut applied = false;
                self.state.send_modify(|s| {
                    s.loading = false;
                    // A logout while the update was in flight wins.
                    if s.token.as_deref() == Some(token.as_str()) {
                        s.user = Some(user.clone());
                        applied = true;
                    }
                    s.phase = s.settled_phase();
                });
                if applied {
                    info!(username = %user.username, "profile updated");
                }
                Ok(user)
            }
            Err(err) => {
                let err = ClientError::from_transport(err, UPDATE_FAILED);
                warn!("profile update failed: {err}");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(err.to_string());
                    s.phase = s.settled_phase();
                });
                Err(err)
            }
        }
    }

    /// Drops the session. No network call is made.
    pub async fn logout(&self) {
        self.state.send_modify(|s| {
            s.user = None;
            s.token = None;
            s.is_authenticated = false;
            s.loading = false;
            s.phase = SessionPhase::Anonymous;
        });
        self.persistence.clear_token().await;
        info!("signed out");
    }

    fn begin(&self, phase: SessionPhase) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.phase = phase;
        });
    }

    fn settle_anonymous(&self) {
        self.state.send_modify(|s| {
            s.user = None;
            s.token = None;
            s.is_authenticated = false;
            s.is_initialized = true;
            s.loading = false;
            s.phase = SessionPhase::Anonymous;
        });
    }

    async fn finish_sign_in(
        &self,
        result: TransportResult<UserProfile>,
        fallback: &str,
    ) -> ClientResult<UserProfile> {
        match result {
            Ok(user) => {
                self.persistence.store_token(&user.token).await;
                info!(username = %user.username, "signed in");
                self.state.send_modify(|s| {
                    s.user = Some(user.clone());
                    s.token = Some(user.token.clone());
                    s.is_authenticated = true;
                    s.loading = false;
                    s.phase = SessionPhase::Authenticated;
                });
                Ok(user)
            }
            Err(err) => {
                let err = ClientError::from_transport(err, fallback);
                warn!("sign-in failed: {err}");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(err.to_string());
                    s.phase = s.settled_phase();
                });
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
