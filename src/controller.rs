//! List state controller: the in-memory copy of a remote collection and its reconciliation rules

use futures_util::future::BoxFuture;
use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::collection::RemoteCollection;
use crate::config::ClientOptions;
use crate::entity::{Draft, Entity};
use crate::error::{Error, Result};
use crate::form::{DeletePrompt, FormMode, FormSession};
use crate::notification::{NotificationChannel, NotificationKind};
use crate::paginator::{PageWindow, Paginator};

/// Lifecycle of a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// Nothing requested yet
    Idle,
    /// Initial or repeated fetch in flight
    Loading,
    /// Collection is usable
    Ready,
    /// The last fetch failed; the collection is unchanged
    LoadFailed,
    /// At least one mutation is in flight
    Submitting,
    /// The last mutation failed; the collection is unchanged
    SubmitFailed,
}

/// Which change a mutation makes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update(String),
    Delete(String),
}

impl MutationKind {
    fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "add",
            MutationKind::Update(_) => "update",
            MutationKind::Delete(_) => "delete",
        }
    }

    fn past(&self) -> &'static str {
        match self {
            MutationKind::Create => "added",
            MutationKind::Update(_) => "updated",
            MutationKind::Delete(_) => "deleted",
        }
    }
}

/// Result of a dispatched mutation, to be handed back to [`ListController::apply`]
#[derive(Debug)]
pub struct Mutation<E> {
    seq: u64,
    generation: u64,
    kind: MutationKind,
    form_session: Option<u64>,
    result: Result<Option<E>>,
}

impl<E> Mutation<E> {
    /// Request sequence number, increasing in dispatch order
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The requested change
    pub fn kind(&self) -> &MutationKind {
        &self.kind
    }

    /// Whether the server accepted the change
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of a dispatched fetch, to be handed back to [`ListController::apply_load`]
#[derive(Debug)]
pub struct LoadResult<E> {
    seq: u64,
    generation: u64,
    result: Result<Vec<E>>,
}

impl<E> LoadResult<E> {
    /// Request sequence number
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Owns one view's collection.
///
/// The collection is filled by a single fetch and afterwards patched from each mutation's response:
/// create appends, update replaces by identifier, delete removes by identifier. It is never
/// re-fetched after a mutation.
///
/// Each operation is available as `dispatch_*` (returns a `'static` future that owns what it needs)
/// and `apply*` (reconciles the result), so several requests can be in flight and their results applied
/// in arrival order. Errors are logged and raised as notifications; they are also returned so callers
/// can react to [`Error::requires_login`].
pub struct ListController<E: Entity> {
    client: Arc<dyn RemoteCollection<E>>,
    items: Vec<E>,
    state: ListState,
    paginator: Paginator,
    form: FormSession,
    delete_prompt: DeletePrompt,
    notifications: NotificationChannel,
    generation: u64,
    next_seq: u64,
    latest_load: u64,
    in_flight: usize,
    mounted: bool,
    last_notice: Option<u64>,
}

impl<E: Entity> ListController<E> {
    /// Create a controller with its own notification channel
    pub fn new(client: Arc<dyn RemoteCollection<E>>, options: &ClientOptions) -> Self {
        let notifications = NotificationChannel::new(options.notification_duration);
        Self::with_notifications(client, options, notifications)
    }

    /// Create a controller that reports into an existing notification channel
    pub fn with_notifications(
        client: Arc<dyn RemoteCollection<E>>,
        options: &ClientOptions,
        notifications: NotificationChannel,
    ) -> Self {
        Self {
            client,
            items: Vec::new(),
            state: ListState::Idle,
            paginator: Paginator::new(options.page_size),
            form: FormSession::new(E::schema()),
            delete_prompt: DeletePrompt::default(),
            notifications,
            generation: 0,
            next_seq: 0,
            latest_load: 0,
            in_flight: 0,
            mounted: true,
            last_notice: None,
        }
    }

    fn label(&self) -> &'static str {
        E::schema().label
    }

    fn notify(&mut self, kind: NotificationKind, message: String) {
        self.last_notice = Some(self.notifications.raise(kind, message));
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Current lifecycle state
    pub fn state(&self) -> ListState {
        self.state
    }

    /// The whole collection in server order
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Find a record by identifier
    pub fn find(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    /// Number of requests whose result has not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Whether results are still being applied
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // -- pagination --

    /// Current page, from 1
    pub fn page(&self) -> usize {
        self.paginator.page()
    }

    /// Bounds of the current page
    pub fn window(&self) -> PageWindow {
        self.paginator.window(self.items.len())
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.window().page_count
    }

    /// Records on the current page
    pub fn page_items(&self) -> &[E] {
        self.window().slice(&self.items)
    }

    /// Move to another page; never fetches
    pub fn set_page(&mut self, page: usize) {
        self.paginator.set_page(page, self.items.len());
    }

    // -- form and prompt --

    /// The create/edit modal
    pub fn form(&self) -> &FormSession {
        &self.form
    }

    /// Mutable access to the modal, for field edits and cancel
    pub fn form_mut(&mut self) -> &mut FormSession {
        &mut self.form
    }

    /// Open the modal with a blank draft
    pub fn open_create(&mut self) {
        self.form.open_create();
    }

    /// Open the modal with a copy of the record `id`
    pub fn open_edit(&mut self, id: &str) -> Result<()> {
        let record = self
            .find(id)
            .cloned()
            .ok_or_else(|| Error::validation(format!("{} {} is not loaded", self.label(), id)))?;
        self.form.open_edit(&record)
    }

    /// The delete confirmation prompt
    pub fn delete_prompt(&self) -> &DeletePrompt {
        &self.delete_prompt
    }

    /// Notifications raised by this controller
    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    // -- load --

    /// Start fetching the full collection
    pub fn dispatch_load(&mut self) -> BoxFuture<'static, LoadResult<E>> {
        let seq = self.next_seq();
        let generation = self.generation;
        self.latest_load = seq;
        self.state = ListState::Loading;

        let client = Arc::clone(&self.client);
        Box::pin(async move {
            let result = client.list().await;
            LoadResult {
                seq,
                generation,
                result,
            }
        })
    }

    /// Install a fetched collection, or record the failure
    pub fn apply_load(&mut self, load: LoadResult<E>) -> Result<()> {
        if !self.mounted || load.generation != self.generation || load.seq < self.latest_load {
            debug!("Discarding stale {} list response #{}", self.label(), load.seq);
            return Ok(());
        }

        match load.result {
            Ok(items) => {
                info!("Loaded {} {} records", items.len(), self.label());
                self.items = items;
                self.paginator.clamp(self.items.len());
                self.state = ListState::Ready;
                Ok(())
            }
            Err(err) => {
                error!("Failed to fetch {} records: {}", self.label(), err);
                self.state = ListState::LoadFailed;
                let message = format!(
                    "Failed to fetch {} records: {}",
                    self.label(),
                    err.user_message()
                );
                self.notify(NotificationKind::Failure, message);
                Err(err)
            }
        }
    }

    /// Fetch the full collection and replace the local copy
    pub async fn load(&mut self) -> Result<()> {
        let pending = self.dispatch_load();
        let result = pending.await;
        self.apply_load(result)
    }

    /// Replace the collection wholesale with records the server returned (bulk upload)
    pub fn replace_all(&mut self, items: Vec<E>) {
        info!("Replacing {} collection with {} records", self.label(), items.len());
        self.items = items;
        self.paginator.clamp(self.items.len());
        self.state = ListState::Ready;
        let message = format!("{} records uploaded successfully!", self.label());
        self.notify(NotificationKind::Success, message);
    }

    // -- mutations --

    fn reject(&mut self, err: Error, kind: &MutationKind) -> Error {
        warn!("Rejected {} {}: {}", self.label(), kind.verb(), err);
        self.state = ListState::SubmitFailed;
        self.notify(NotificationKind::Failure, err.user_message());
        err
    }

    fn begin(
        &mut self,
        kind: MutationKind,
        draft: Option<Draft>,
    ) -> BoxFuture<'static, Mutation<E>> {
        let seq = self.next_seq();
        let generation = self.generation;
        let form_session = self.form_session_for(&kind);
        self.in_flight += 1;
        self.state = ListState::Submitting;
        debug!("Dispatching {} {} #{}", self.label(), kind.verb(), seq);

        let client = Arc::clone(&self.client);
        Box::pin(async move {
            let result = match (&kind, draft) {
                (MutationKind::Create, Some(draft)) => client.create(&draft).await.map(Some),
                (MutationKind::Update(id), Some(draft)) => client.update(id, &draft).await.map(Some),
                (MutationKind::Delete(id), _) => client.delete(id).await.map(|_| None),
                (_, None) => Err(Error::validation("Nothing to submit")),
            };
            Mutation {
                seq,
                generation,
                kind,
                form_session,
                result,
            }
        })
    }

    /// The open modal session a mutation of `kind` was submitted from, if any
    fn form_session_for(&self, kind: &MutationKind) -> Option<u64> {
        let matches = match (kind, self.form.mode()) {
            (MutationKind::Create, FormMode::Create) => true,
            (MutationKind::Update(id), FormMode::Edit(editing)) => id == editing,
            _ => false,
        };
        (self.form.is_open() && matches).then(|| self.form.session_id())
    }

    /// Validate `draft` and start creating it
    pub fn dispatch_create(&mut self, draft: Draft) -> Result<BoxFuture<'static, Mutation<E>>> {
        let kind = MutationKind::Create;
        if let Err(err) = draft.validate(true) {
            return Err(self.reject(err, &kind));
        }
        Ok(self.begin(kind, Some(draft)))
    }

    /// Validate `draft` and start updating record `id`
    pub fn dispatch_update(
        &mut self,
        id: &str,
        draft: Draft,
    ) -> Result<BoxFuture<'static, Mutation<E>>> {
        let kind = MutationKind::Update(id.to_string());
        if let Err(err) = draft.validate(false) {
            return Err(self.reject(err, &kind));
        }
        Ok(self.begin(kind, Some(draft)))
    }

    /// Start deleting the record held by the confirmation prompt, closing the prompt.
    ///
    /// Returns `None` if no delete was requested.
    pub fn dispatch_delete(&mut self) -> Option<BoxFuture<'static, Mutation<E>>> {
        let id = self.delete_prompt.target()?.to_string();
        self.delete_prompt.close();
        Some(self.begin(MutationKind::Delete(id), None))
    }

    /// Reconcile the collection with one mutation's result.
    ///
    /// Results from before [`teardown`](Self::teardown) are discarded.
    pub fn apply(&mut self, mutation: Mutation<E>) -> Result<()> {
        if !self.mounted || mutation.generation != self.generation {
            debug!(
                "Discarding stale {} {} response #{}",
                self.label(),
                mutation.kind.verb(),
                mutation.seq
            );
            return Ok(());
        }
        self.in_flight = self.in_flight.saturating_sub(1);

        let Mutation {
            kind,
            form_session,
            result,
            ..
        } = mutation;
        match result {
            Ok(record) => {
                self.reconcile(&kind, record);
                if form_session.is_some_and(|id| self.form.is_open() && self.form.session_id() == id) {
                    self.form.close();
                }
                self.paginator.clamp(self.items.len());
                if self.in_flight == 0 {
                    self.state = ListState::Ready;
                }
                let message = format!("{} {} successfully!", self.label(), kind.past());
                self.notify(NotificationKind::Success, message);
                Ok(())
            }
            Err(err) => {
                error!("Failed to {} {}: {}", kind.verb(), self.label(), err);
                if self.in_flight == 0 {
                    self.state = ListState::SubmitFailed;
                }
                let message = format!(
                    "Failed to {} {}: {}",
                    kind.verb(),
                    self.label().to_lowercase(),
                    err.user_message()
                );
                self.notify(NotificationKind::Failure, message);
                Err(err)
            }
        }
    }

    fn reconcile(&mut self, kind: &MutationKind, record: Option<E>) {
        match (kind, record) {
            (MutationKind::Create, Some(record)) => {
                // the server owns identifiers; a repeated one replaces instead of duplicating
                let existing = record
                    .id()
                    .and_then(|id| self.items.iter().position(|item| item.id() == Some(id)));
                match existing {
                    Some(index) => self.items[index] = record,
                    None => self.items.push(record),
                }
            }
            (MutationKind::Update(id), Some(record)) => {
                match self.items.iter().position(|item| item.id() == Some(id.as_str())) {
                    Some(index) => self.items[index] = record,
                    None => debug!("{} {} no longer loaded; nothing to replace", self.label(), id),
                }
            }
            (MutationKind::Delete(id), _) => {
                self.items.retain(|item| item.id() != Some(id.as_str()));
            }
            (_, None) => {}
        }
    }

    /// Validate and create `draft`, appending the server's record
    pub async fn submit_create(&mut self, draft: Draft) -> Result<()> {
        let pending = self.dispatch_create(draft)?;
        let mutation = pending.await;
        self.apply(mutation)
    }

    /// Validate and update record `id`, replacing it with the server's record
    pub async fn submit_update(&mut self, id: &str, draft: Draft) -> Result<()> {
        let pending = self.dispatch_update(id, draft)?;
        let mutation = pending.await;
        self.apply(mutation)
    }

    /// Submit the open modal according to its mode
    pub async fn submit_form(&mut self) -> Result<()> {
        let draft = self.form.draft().clone();
        match self.form.mode().clone() {
            FormMode::Create => self.submit_create(draft).await,
            FormMode::Edit(id) => self.submit_update(&id, draft).await,
        }
    }

    /// Ask for confirmation before deleting record `id`
    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.delete_prompt.open(id);
    }

    /// Close the confirmation prompt without deleting
    pub fn cancel_delete(&mut self) {
        self.delete_prompt.close();
    }

    /// Delete the record awaiting confirmation; does nothing if none is
    pub async fn confirm_delete(&mut self) -> Result<()> {
        match self.dispatch_delete() {
            Some(pending) => {
                let mutation = pending.await;
                self.apply(mutation)
            }
            None => Ok(()),
        }
    }

    /// Stop applying results; anything still in flight is discarded when it arrives
    pub fn teardown(&mut self) {
        debug!("Tearing down {} list with {} requests in flight", self.label(), self.in_flight);
        self.mounted = false;
        self.generation += 1;
        self.in_flight = 0;
        self.form.close();
        self.delete_prompt.close();
        if let Some(id) = self.last_notice.take() {
            self.notifications.withdraw(id);
        }
    }
}
