//! Typed endpoints of the MindCare API.

use super::models::{
    Ack, Appointment, AppointmentDraft, AppointmentStatus, AuthResponse, Category, Credentials,
    DashboardStats, ForumPost, ForumThread, Identity, Medication, MedicationDraft, PostDraft,
    ProfileFields, RegisterRequest, ReplyDraft,
};
use super::transport::{ApiRequest, Method, Transport};
use crate::backend::services::credentials::CredentialStore;
use crate::utils::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, MutexGuard};

/// Bearer token as last seen by this process.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Bearer {
    /// The credential store has not been read yet.
    Unloaded,
    SignedOut,
    Token(String),
}

/// API handle shared by the session guard and every screen.
///
/// The credential store is read once; after that the in-memory token decides what
/// is attached to requests, so signing out takes effect even if the store cannot be
/// cleared.
#[derive(Clone)]
pub struct Api {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    bearer: Arc<Mutex<Bearer>>,
}

impl Api {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
            bearer: Arc::new(Mutex::new(Bearer::Unloaded)),
        }
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    fn lock_bearer(&self) -> MutexGuard<'_, Bearer> {
        self.bearer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The token attached to requests, loading it from the store on first use.
    pub async fn bearer(&self) -> Option<String> {
        let cached = self.lock_bearer().clone();
        match cached {
            Bearer::SignedOut => return None,
            Bearer::Token(token) => return Some(token),
            Bearer::Unloaded => {}
        }

        let loaded = self.credentials.load().await;
        let mut bearer = self.lock_bearer();
        // A sign-in or sign-out that finished meanwhile wins over the stored value.
        if *bearer == Bearer::Unloaded {
            *bearer = match &loaded {
                Some(token) => Bearer::Token(token.clone()),
                None => Bearer::SignedOut,
            };
        }
        match &*bearer {
            Bearer::Token(token) => Some(token.clone()),
            _ => None,
        }
    }

    /// Persists `token` and attaches it to every later request.
    pub async fn sign_in(&self, token: &str) -> Result<()> {
        self.credentials.store(token).await?;
        *self.lock_bearer() = Bearer::Token(token.to_string());
        Ok(())
    }

    /// Stops attaching a token at once, then removes the persisted one.
    ///
    /// An error means only the persisted copy may remain; requests from this
    /// process carry no token either way.
    pub async fn sign_out(&self) -> Result<()> {
        *self.lock_bearer() = Bearer::SignedOut;
        self.credentials.clear().await
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let bearer = self.bearer().await;
        let value = self.transport.send(request.bearer(bearer)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Mutations may answer with an empty body.
    async fn mutate(&self, request: ApiRequest) -> Result<Ack> {
        let value: Value = self.call(request).await?;
        if value.is_null() {
            return Ok(Ack::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    fn with_body<B: Serialize>(request: ApiRequest, body: &B) -> Result<ApiRequest> {
        Ok(request.body(serde_json::to_value(body)?))
    }

    // Auth

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.call(Self::with_body(
            ApiRequest::new(Method::Post, "/auth/login"),
            credentials,
        )?)
        .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        self.call(Self::with_body(
            ApiRequest::new(Method::Post, "/auth/register"),
            request,
        )?)
        .await
    }

    pub async fn me(&self) -> Result<Identity> {
        self.call(ApiRequest::new(Method::Get, "/auth/me")).await
    }

    pub async fn update_profile(&self, fields: &ProfileFields) -> Result<Ack> {
        self.mutate(Self::with_body(ApiRequest::new(Method::Put, "/profile"), fields)?)
            .await
    }

    // Medications

    pub async fn medications(&self) -> Result<Vec<Medication>> {
        self.call(ApiRequest::new(Method::Get, "/medications")).await
    }

    pub async fn create_medication(&self, draft: &MedicationDraft) -> Result<Ack> {
        self.mutate(Self::with_body(
            ApiRequest::new(Method::Post, "/medications"),
            draft,
        )?)
        .await
    }

    pub async fn update_medication(&self, id: i64, draft: &MedicationDraft) -> Result<Ack> {
        self.mutate(Self::with_body(
            ApiRequest::new(Method::Put, format!("/medications/{id}")),
            draft,
        )?)
        .await
    }

    pub async fn delete_medication(&self, id: i64) -> Result<Ack> {
        self.mutate(ApiRequest::new(Method::Delete, format!("/medications/{id}")))
            .await
    }

    // Appointments

    pub async fn appointments(&self) -> Result<Vec<Appointment>> {
        self.call(ApiRequest::new(Method::Get, "/appointments")).await
    }

    pub async fn create_appointment(&self, draft: &AppointmentDraft) -> Result<Ack> {
        self.mutate(Self::with_body(
            ApiRequest::new(Method::Post, "/appointments"),
            draft,
        )?)
        .await
    }

    pub async fn update_appointment(&self, id: i64, draft: &AppointmentDraft) -> Result<Ack> {
        self.mutate(Self::with_body(
            ApiRequest::new(Method::Put, format!("/appointments/{id}")),
            draft,
        )?)
        .await
    }

    /// Partial update that only touches `status`.
    pub async fn set_appointment_status(&self, id: i64, status: AppointmentStatus) -> Result<Ack> {
        let request = ApiRequest::new(Method::Put, format!("/appointments/{id}"))
            .body(json!({ "status": status }));
        self.mutate(request).await
    }

    pub async fn delete_appointment(&self, id: i64) -> Result<Ack> {
        self.mutate(ApiRequest::new(Method::Delete, format!("/appointments/{id}")))
            .await
    }

    // Forum

    pub async fn forum_posts(&self, category: Option<Category>) -> Result<Vec<ForumPost>> {
        let mut request = ApiRequest::new(Method::Get, "/forum/posts");
        if let Some(category) = category {
            request = request.query("category", category.as_str());
        }
        self.call(request).await
    }

    pub async fn forum_post(&self, id: i64) -> Result<ForumThread> {
        self.call(ApiRequest::new(Method::Get, format!("/forum/posts/{id}")))
            .await
    }

    pub async fn create_post(&self, draft: &PostDraft) -> Result<Ack> {
        self.mutate(Self::with_body(
            ApiRequest::new(Method::Post, "/forum/posts"),
            draft,
        )?)
        .await
    }

    pub async fn create_reply(&self, post_id: i64, draft: &ReplyDraft) -> Result<Ack> {
        self.mutate(Self::with_body(
            ApiRequest::new(Method::Post, format!("/forum/posts/{post_id}/replies")),
            draft,
        )?)
        .await
    }

    // Dashboard

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.call(ApiRequest::new(Method::Get, "/dashboard/stats"))
            .await
    }
}
