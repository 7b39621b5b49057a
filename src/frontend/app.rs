//! Application wiring.

use crate::backend::api::client::Api;
use crate::backend::api::transport::{HttpTransport, Transport};
use crate::backend::services::credentials::{CredentialStore, FileCredentialStore};
use crate::backend::utils::config::AppConfig;
use crate::backend::utils::route::{Admission, Route, UnknownRoute};
use crate::frontend::services::appointments::{Appointments, AppointmentsScreen};
use crate::frontend::services::context::SessionGuard;
use crate::frontend::services::dashboard::DashboardScreen;
use crate::frontend::services::forum::{ForumPosts, ForumScreen, ThreadScreen};
use crate::frontend::services::medications::{Medications, MedicationsScreen};
use crate::frontend::services::profile::ProfileScreen;
use crate::utils::Result;
use std::sync::Arc;

/// The session guard plus a factory for every screen, all sharing one [`Api`].
pub struct App {
    api: Arc<Api>,
    session: SessionGuard,
}

impl App {
    /// Real HTTP transport and on-disk credential.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.api)?;
        let credentials = FileCredentialStore::new(config.storage.credential_file.clone());
        Ok(Self::new(Arc::new(transport), Arc::new(credentials)))
    }

    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
        let api = Arc::new(Api::new(transport, credentials));
        Self {
            session: SessionGuard::new(Arc::clone(&api)),
            api,
        }
    }

    pub fn api(&self) -> &Arc<Api> {
        &self.api
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionGuard {
        &mut self.session
    }

    /// Resolves a path against the current session.
    pub fn navigate(&self, path: &str) -> std::result::Result<Admission, UnknownRoute> {
        let route: Route = path.parse()?;
        Ok(self.session.admit(&route))
    }

    pub fn dashboard(&self) -> DashboardScreen {
        DashboardScreen::new(Arc::clone(&self.api))
    }

    pub fn medications(&self) -> MedicationsScreen {
        MedicationsScreen::new(Medications, Arc::clone(&self.api))
    }

    pub fn appointments(&self) -> AppointmentsScreen {
        AppointmentsScreen::new(Appointments, Arc::clone(&self.api))
    }

    pub fn forum(&self) -> ForumScreen {
        ForumScreen::new(ForumPosts, Arc::clone(&self.api))
    }

    pub fn thread(&self, post_id: i64) -> ThreadScreen {
        ThreadScreen::for_post(Arc::clone(&self.api), post_id)
    }

    pub fn profile(&self) -> ProfileScreen {
        ProfileScreen::new(Arc::clone(&self.api))
    }
}
