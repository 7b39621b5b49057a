//! Fetch, mutate, refetch.
//!
//! Every collection screen (medications, appointments, forum posts, a forum thread)
//! follows the same cycle: fetch on mount, and after any successful write discard the
//! local copy and fetch the whole collection again. Nothing is patched locally.
//!
//! Screens are cheap to clone and share their state. Every fetch takes a new
//! generation, so a response that was overtaken by a later fetch, or that arrives
//! after [`ResourceScreen::unmount`], is recognised and dropped.

use crate::backend::api::client::Api;
use crate::backend::api::models::Validate;
use crate::utils::Result;
use async_trait::async_trait;
use log::{debug, error, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// A server collection that can be listed and appended to.
#[async_trait]
pub trait Collection: Send + Sync + 'static {
    /// What narrows the collection (a filter, a parent id, or nothing).
    ///
    /// Screens over a scope without a `Default` must be built with
    /// [`ResourceScreen::with_scope`].
    type Scope: Clone + Send + Sync;
    /// The local copy that gets replaced wholesale.
    type Items: Clone + Default + Send + Sync;
    type Draft: Validate + Clone + Send + Sync;

    /// Name used in log lines.
    fn label(&self) -> &'static str;

    async fn fetch(&self, api: &Api, scope: &Self::Scope) -> Result<Self::Items>;

    async fn create(&self, api: &Api, scope: &Self::Scope, draft: &Self::Draft) -> Result<()>;
}

/// A collection whose records can also be edited and removed by id.
#[async_trait]
pub trait Editable: Collection {
    async fn update(&self, api: &Api, id: i64, draft: &Self::Draft) -> Result<()>;

    async fn delete(&self, api: &Api, id: i64) -> Result<()>;
}

/// Client-side form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form<D> {
    /// `Some(id)` when editing an existing record.
    pub editing: Option<i64>,
    pub draft: D,
    /// Message from the last failed submit.
    pub error: Option<String>,
}

struct ScreenState<R: Collection> {
    scope: R::Scope,
    items: R::Items,
    loading: bool,
    form: Option<Form<R::Draft>>,
    notice: Option<String>,
}

/// One mounted screen over a [`Collection`].
pub struct ResourceScreen<R: Collection> {
    resource: Arc<R>,
    api: Arc<Api>,
    state: Arc<Mutex<ScreenState<R>>>,
    generation: Arc<AtomicU64>,
}

impl<R: Collection> Clone for ResourceScreen<R> {
    fn clone(&self) -> Self {
        Self {
            resource: Arc::clone(&self.resource),
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<R: Collection> ResourceScreen<R>
where
    R::Scope: Default,
{
    /// Screen over the default scope.
    pub fn new(resource: R, api: Arc<Api>) -> Self {
        Self::with_scope(resource, api, R::Scope::default())
    }
}

impl<R: Collection> ResourceScreen<R> {
    pub fn with_scope(resource: R, api: Arc<Api>, scope: R::Scope) -> Self {
        Self {
            resource: Arc::new(resource),
            api,
            state: Arc::new(Mutex::new(ScreenState {
                scope,
                items: R::Items::default(),
                loading: false,
                form: None,
                notice: None,
            })),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ScreenState<R>> {
        // The state is plain data, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn api(&self) -> &Api {
        &self.api
    }

    // Reads

    /// The collection as last received from the server.
    pub fn items(&self) -> R::Items {
        self.lock().items.clone()
    }

    pub fn scope(&self) -> R::Scope {
        self.lock().scope.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn form(&self) -> Option<Form<R::Draft>> {
        self.lock().form.clone()
    }

    /// Screen-level message, set when a delete fails.
    pub fn notice(&self) -> Option<String> {
        self.lock().notice.clone()
    }

    // Lifecycle

    /// Initial fetch.
    pub async fn mount(&self) -> Result<()> {
        self.list().await
    }

    /// Marks the screen as gone; responses still in flight are discarded.
    pub fn unmount(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Changes the scope and refetches. Older in-flight responses are discarded.
    pub async fn set_scope(&self, scope: R::Scope) -> Result<()> {
        self.lock().scope = scope;
        self.list().await
    }

    /// Replaces the local collection with the server's.
    ///
    /// Each call starts a new generation, so only the most recently started fetch is
    /// applied. On failure the previous collection stays in place and the error is logged.
    pub async fn list(&self) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let scope = {
            let mut state = self.lock();
            state.loading = true;
            state.scope.clone()
        };

        let result = self.resource.fetch(&self.api, &scope).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale {} response", self.resource.label());
            return Ok(());
        }

        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(items) => {
                state.items = items;
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch {}: {e}", self.resource.label());
                Err(e)
            }
        }
    }

    // Forms

    pub fn open_create(&self, draft: R::Draft) {
        self.lock().form = Some(Form {
            editing: None,
            draft,
            error: None,
        });
    }

    pub fn open_edit(&self, id: i64, draft: R::Draft) {
        self.lock().form = Some(Form {
            editing: Some(id),
            draft,
            error: None,
        });
    }

    pub fn close_form(&self) {
        self.lock().form = None;
    }

    /// Keeps the form open with what the user typed and the message to show.
    fn keep_form(&self, editing: Option<i64>, draft: R::Draft, message: &str) {
        self.lock().form = Some(Form {
            editing,
            draft,
            error: Some(message.to_string()),
        });
    }

    /// Submits a new record. Only required fields are checked locally.
    ///
    /// Success closes the form and refetches; failure keeps the form open with the
    /// entered values and the server's message.
    pub async fn create(&self, draft: R::Draft) -> Result<()> {
        if let Err(e) = draft.validate() {
            self.keep_form(None, draft, e.message());
            return Err(e);
        }

        let scope = self.scope();
        match self.resource.create(&self.api, &scope, &draft).await {
            Ok(()) => {
                self.close_form();
                self.refetch().await;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to create {}: {e}", self.resource.label());
                self.keep_form(None, draft, e.message());
                Err(e)
            }
        }
    }

    /// Runs a write that has no form attached, refetching once it succeeds.
    pub(crate) async fn run_mutation(&self, action: &str, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                self.lock().notice = None;
                self.refetch().await;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to {action} {}: {e}", self.resource.label());
                self.lock().notice = Some(e.message().to_string());
                Err(e)
            }
        }
    }

    /// Follow-up fetch after a completed write. Its failure does not undo the write.
    async fn refetch(&self) {
        let _ = self.list().await;
    }
}

impl<R: Editable> ResourceScreen<R> {
    /// Same contract as [`ResourceScreen::create`], for one existing record.
    pub async fn update(&self, id: i64, draft: R::Draft) -> Result<()> {
        if let Err(e) = draft.validate() {
            self.keep_form(Some(id), draft, e.message());
            return Err(e);
        }

        match self.resource.update(&self.api, id, &draft).await {
            Ok(()) => {
                self.close_form();
                self.refetch().await;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to update {} {id}: {e}", self.resource.label());
                self.keep_form(Some(id), draft, e.message());
                Err(e)
            }
        }
    }

    /// Submits whatever form is open, as a create or an update.
    pub async fn submit(&self) -> Result<()> {
        let Some(form) = self.form() else {
            return Err(crate::invalid!("No form is open"));
        };
        match form.editing {
            Some(id) => self.update(id, form.draft).await,
            None => self.create(form.draft).await,
        }
    }

    /// Deletes a record once `confirm` agrees. Returns `Ok(false)` when declined.
    ///
    /// Failures are logged and set [`ResourceScreen::notice`].
    pub async fn delete<F>(&self, id: i64, confirm: F) -> Result<bool>
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            debug!("Delete of {} {id} cancelled", self.resource.label());
            return Ok(false);
        }

        let result = self.resource.delete(&self.api, id).await;
        self.run_mutation("delete", result).await.map(|()| true)
    }
}
