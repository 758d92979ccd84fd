// ── Generic resource CRUD controller ──
//
// One controller type drives every collection page (addresses, wishlist,
// orders). It owns the fetch/loading/notify discipline so pages only add
// their resource-specific rules on top.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::debug;

use storefront_api::ResourceId;

use crate::error::CoreError;
use crate::notify::{Confirm, Notification, Notifier};
use crate::validate::Validate;

// ── Capabilities ─────────────────────────────────────────────────────

/// A server-persisted record shown in a collection.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Human-readable singular name ("Address").
    const LABEL: &'static str;

    fn id(&self) -> &ResourceId;
}

/// Services that can list a collection. Every method is one request and
/// returns an already-normalized error.
pub trait ListResource: Send + Sync {
    type Item: Resource;

    fn list(&self) -> impl Future<Output = Result<Vec<Self::Item>, CoreError>> + Send;
}

pub trait CreateResource: ListResource {
    type Draft: Validate + Send + Sync;

    fn create(
        &self,
        draft: &Self::Draft,
    ) -> impl Future<Output = Result<Self::Item, CoreError>> + Send;
}

pub trait UpdateResource: CreateResource {
    fn update(
        &self,
        id: &ResourceId,
        draft: &Self::Draft,
    ) -> impl Future<Output = Result<Self::Item, CoreError>> + Send;
}

pub trait DeleteResource: ListResource {
    fn delete(&self, id: &ResourceId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ── In-flight guard ──────────────────────────────────────────────────

/// At most one request per action at a time; a second attempt while the
/// first runs is refused instead of queued.
#[derive(Debug, Default)]
pub(crate) struct InFlight(AtomicBool);

impl InFlight {
    pub(crate) fn begin(&self, operation: &'static str) -> Result<InFlightGuard<'_>, CoreError> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CoreError::Busy { operation })?;
        Ok(InFlightGuard(&self.0))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub(crate) struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ── Collection state ─────────────────────────────────────────────────

/// Observable state of one collection page.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<R> {
    /// Records in server response order.
    pub items: Vec<R>,
    /// A fetch is in flight.
    pub loading: bool,
    /// A create/update/delete is in flight.
    pub submitting: bool,
    /// At least one fetch has succeeded since mount.
    pub loaded: bool,
}

impl<R> Default for CollectionState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            submitting: false,
            loaded: false,
        }
    }
}

/// Outcome of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deleted {
    Removed,
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

// ── Controller ───────────────────────────────────────────────────────

pub struct ResourceController<S: ListResource> {
    service: S,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<CollectionState<S::Item>>,
    mounted: AtomicBool,
    fetching: InFlight,
    submitting: InFlight,
}

impl<S: ListResource> ResourceController<S> {
    pub fn new(service: S, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(CollectionState::default());
        Self {
            service,
            notifier,
            state,
            mounted: AtomicBool::new(false),
            fetching: InFlight::default(),
            submitting: InFlight::default(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Current state (cheap clone of the latest snapshot).
    pub fn snapshot(&self) -> CollectionState<S::Item> {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<CollectionState<S::Item>> {
        self.state.subscribe()
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.state.borrow().items.clone()
    }

    pub fn find(&self, id: &ResourceId) -> Option<S::Item> {
        self.state.borrow().items.iter().find(|r| r.id() == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_active()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Fetch the collection the first time the page is shown. Later calls
    /// are no-ops until [`unmount`](Self::unmount).
    pub async fn mount(&self) -> Result<(), CoreError> {
        if self.mounted.swap(true, Ordering::AcqRel) {
            debug!(resource = S::Item::LABEL, "already mounted");
            return Ok(());
        }
        self.refresh().await
    }

    /// Drop everything held in memory; the next mount fetches again.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
        self.state.send_replace(CollectionState::default());
    }

    /// Re-fetch the collection.
    ///
    /// On failure the previous items stay in place and an error
    /// notification is emitted.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let _guard = self.fetching.begin("Loading")?;
        self.state.send_modify(|s| s.loading = true);

        match self.service.list().await {
            Ok(items) => {
                debug!(resource = S::Item::LABEL, count = items.len(), "fetched");
                self.state.send_modify(|s| {
                    s.items = items;
                    s.loading = false;
                    s.loaded = true;
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| s.loading = false);
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Run one mutating request under the submit guard.
    ///
    /// On success `success` is announced and the collection re-fetched; on
    /// failure the error is announced and the collection left untouched.
    pub async fn mutate<T, F>(
        &self,
        operation: &'static str,
        success: &str,
        request: F,
    ) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>> + Send,
    {
        let _guard = self.submitting.begin(operation)?;
        self.state.send_modify(|s| s.submitting = true);
        let result = request.await;
        self.state.send_modify(|s| s.submitting = false);

        match result {
            Ok(value) => {
                self.notifier.notify(Notification::success(success));
                if let Err(e) = self.refresh().await {
                    debug!(error = %e, "re-fetch after {operation} failed");
                }
                Ok(value)
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    pub(crate) fn reject_invalid(&self, draft: &impl Validate) -> Result<(), CoreError> {
        let errors = draft.validate();
        if errors.is_empty() {
            return Ok(());
        }
        self.notifier.notify(Notification::warning(errors.to_string()));
        Err(CoreError::Validation(errors))
    }
}

impl<S: CreateResource> ResourceController<S> {
    /// Validate, create, re-fetch.
    pub async fn create(&self, draft: &S::Draft) -> Result<S::Item, CoreError> {
        self.reject_invalid(draft)?;
        let success = format!("{} added", S::Item::LABEL);
        self.mutate("Save", &success, self.service.create(draft))
            .await
    }
}

impl<S: UpdateResource> ResourceController<S> {
    /// Validate, replace, re-fetch.
    pub async fn update(&self, id: &ResourceId, draft: &S::Draft) -> Result<S::Item, CoreError> {
        self.reject_invalid(draft)?;
        let success = format!("{} updated", S::Item::LABEL);
        self.mutate("Save", &success, self.service.update(id, draft))
            .await
    }
}

impl<S: DeleteResource> ResourceController<S> {
    /// Confirm, delete, re-fetch. Nothing is removed locally before the
    /// server agrees.
    pub async fn delete(
        &self,
        id: &ResourceId,
        confirm: &dyn Confirm,
    ) -> Result<Deleted, CoreError> {
        let prompt = format!("Delete this {}?", S::Item::LABEL.to_lowercase());
        if !confirm.confirm(&prompt) {
            debug!(%id, "delete declined");
            return Ok(Deleted::Declined);
        }
        let success = format!("{} removed", S::Item::LABEL);
        self.mutate("Delete", &success, self.service.delete(id))
            .await?;
        Ok(Deleted::Removed)
    }
}
