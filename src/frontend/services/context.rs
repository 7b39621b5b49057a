//! Authentication context and state management.

use crate::backend::api::client::Api;
use crate::backend::api::models::{
    AuthResponse, Credentials, Identity, ProfileFields, RegisterRequest, Registration, Validate,
};
use crate::backend::utils::route::{Admission, Route, admit};
use crate::utils::Result;
use log::{debug, info, warn};
use std::sync::Arc;

/// Who is using the app right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The persisted credential has not been checked yet.
    Resolving,
    Authenticated(Identity),
    Anonymous,
}

impl SessionState {
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Owns the authentication state and decides which routes may render.
///
/// State only changes through the methods below; everything else reads it.
pub struct SessionGuard {
    api: Arc<Api>,
    state: SessionState,
    resolved: bool,
}

impl SessionGuard {
    pub fn new(api: Arc<Api>) -> Self {
        Self {
            api,
            state: SessionState::Resolving,
            resolved: false,
        }
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub const fn identity(&self) -> Option<&Identity> {
        self.state.identity()
    }

    pub fn api(&self) -> &Arc<Api> {
        &self.api
    }

    /// Checks the persisted credential against `/auth/me`. Runs once per guard.
    pub async fn resolve(&mut self) -> &SessionState {
        if self.resolved {
            return &self.state;
        }
        self.resolved = true;

        if self.api.bearer().await.is_none() {
            debug!("No stored credential, starting anonymous");
            self.state = SessionState::Anonymous;
            return &self.state;
        }

        match self.api.me().await {
            Ok(identity) => {
                info!("Session restored for {}", identity.username);
                self.state = SessionState::Authenticated(identity);
            }
            Err(e) => {
                warn!("Stored credential rejected: {e}");
                if let Err(e) = self.api.sign_out().await {
                    warn!("Failed to discard stored credential: {e}");
                }
                self.state = SessionState::Anonymous;
            }
        }

        &self.state
    }

    /// Signs in with email and password.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        credentials.validate()?;

        let response = self.api.login(&credentials).await?;
        self.establish(response).await
    }

    /// Creates an account and signs in with it.
    ///
    /// Password confirmation and minimum length are checked locally; on failure no
    /// request is sent.
    pub async fn register(&mut self, form: &Registration) -> Result<Identity> {
        form.validate()?;

        let response = self.api.register(&RegisterRequest::from(form)).await?;
        self.establish(response).await
    }

    async fn establish(&mut self, response: AuthResponse) -> Result<Identity> {
        let AuthResponse { access_token, user } = response;
        self.api.sign_in(&access_token).await?;
        info!("Signed in as {}", user.username);

        self.resolved = true;
        self.state = SessionState::Authenticated(user.clone());
        Ok(user)
    }

    /// Drops the credential and goes anonymous. Never fails.
    ///
    /// Requests stop carrying the token even when the persisted copy cannot be removed.
    pub async fn logout(&mut self) {
        if let Err(e) = self.api.sign_out().await {
            warn!("Failed to clear stored credential: {e}");
        }
        self.resolved = true;
        self.state = SessionState::Anonymous;
        info!("Signed out");
    }

    /// Applies a saved profile edit to the in-memory identity without refetching.
    pub fn update_identity(&mut self, fields: &ProfileFields) {
        if let SessionState::Authenticated(identity) = &mut self.state {
            identity.merge(fields);
        }
    }

    pub fn admit(&self, route: &Route) -> Admission {
        admit(&self.state, route)
    }
}
