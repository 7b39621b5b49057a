//! Profile page.

use super::context::SessionGuard;
use crate::backend::api::client::Api;
use crate::backend::api::models::{ProfileFields, Validate};
use crate::utils::Result;
use log::{error, warn};
use std::sync::Arc;

/// Profile form backed by `/auth/me` and `PUT /profile`.
pub struct ProfileScreen {
    api: Arc<Api>,
    fields: ProfileFields,
    error: Option<String>,
    saved: bool,
}

impl ProfileScreen {
    pub fn new(api: Arc<Api>) -> Self {
        Self {
            api,
            fields: ProfileFields::default(),
            error: None,
            saved: false,
        }
    }

    /// Fills the form from the server. On failure the form keeps its current values.
    pub async fn mount(&mut self) -> Result<()> {
        match self.api.me().await {
            Ok(identity) => {
                self.fields = ProfileFields::from(&identity);
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch profile: {e}");
                Err(e)
            }
        }
    }

    pub fn fields(&self) -> &ProfileFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut ProfileFields {
        self.saved = false;
        &mut self.fields
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the last save succeeded.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Writes `fields` and echoes them into the session identity.
    ///
    /// The identity is not refetched; the local echo is trusted.
    pub async fn save(&mut self, session: &mut SessionGuard, fields: ProfileFields) -> Result<()> {
        self.saved = false;
        if let Err(e) = fields.validate() {
            self.error = Some(e.message().to_string());
            self.fields = fields;
            return Err(e);
        }

        let result = self.api.update_profile(&fields).await;
        match result {
            Ok(_) => {
                session.update_identity(&fields);
                self.fields = fields;
                self.error = None;
                self.saved = true;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to update profile: {e}");
                self.error = Some(e.message().to_string());
                self.fields = fields;
                Err(e)
            }
        }
    }
}
