use std::collections::VecDeque;
use std::sync::Arc;

use super::actions::CrudAction;
use super::collection::{Backend, Collection};
use super::reference::ReferenceData;
use super::resource::Resource;
use super::state::{ListFilter, ViewState};
use crate::error::RemoteError;
use crate::http_client::HttpBackend;
use crate::models::EntityId;

/// Drives one resource screen: queues actions, runs them one at a time and
/// folds every outcome, failures included, into [`ViewState`].
pub struct CrudManager<R: Resource> {
    // Current state - single source of truth
    state: ViewState<R>,

    backend: Arc<dyn Backend>,

    // Action queue for sequential processing
    pending_actions: VecDeque<CrudAction>,

    is_processing: bool,
}

impl<R: Resource> CrudManager<R> {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            state: ViewState::default(),
            backend,
            pending_actions: VecDeque::new(),
            is_processing: false,
        }
    }

    pub fn connect(base_url: &str) -> Result<Self, RemoteError> {
        Ok(Self::new(Arc::new(HttpBackend::new(base_url)?)))
    }

    /// Synchronous, just queues the action
    pub fn dispatch(&mut self, action: CrudAction) {
        log::debug!("Dispatching action: {}", action.description());
        self.pending_actions.push_back(action);
    }

    /// Processes one action from the queue.
    pub async fn update(&mut self) {
        if self.is_processing {
            return;
        }

        if let Some(action) = self.pending_actions.pop_front() {
            self.is_processing = true;
            log::debug!("Processing action: {}", action.description());

            self.handle_action(action).await;

            self.is_processing = false;
        }
    }

    /// Drains the queue.
    pub async fn run_pending(&mut self) {
        while !self.pending_actions.is_empty() {
            self.update().await;
        }
    }

    pub fn state(&self) -> &ViewState<R> {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut ViewState<R> {
        &mut self.state
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn has_pending_actions(&self) -> bool {
        !self.pending_actions.is_empty() || self.is_processing
    }

    pub fn clear_pending_actions(&mut self) {
        self.pending_actions.clear();
    }

    async fn handle_action(&mut self, action: CrudAction) {
        if action.is_async() && self.state.is_loading {
            log::warn!(
                "⏳ Ignoring '{}': a request is already in flight",
                action.description()
            );
            return;
        }

        // Banners only live until the next action
        self.state.clear_messages();

        match action {
            CrudAction::Mount | CrudAction::Reload => {
                self.handle_load().await;
            }
            CrudAction::SetFilter { filter } => {
                self.state.filter = filter;
                self.handle_load().await;
            }
            CrudAction::OpenCreate => {
                self.state.form.open_create();
            }
            CrudAction::OpenEdit { id } => {
                self.handle_open_edit(id);
            }
            CrudAction::CloseForm => {
                self.state.form.close();
            }
            CrudAction::SetField { name, value } => {
                if let Err(e) = self.state.form.set_field(&name, &value) {
                    self.state.set_error(e.to_string());
                }
            }
            CrudAction::Submit => {
                if self.state.can_submit() {
                    self.handle_submit().await;
                } else {
                    self.state
                        .set_error(format!("No {} form is open", R::NOUN));
                }
            }
            CrudAction::RequestDelete { id } => {
                self.handle_request_delete(id);
            }
            CrudAction::ConfirmDelete => {
                self.handle_confirm_delete().await;
            }
            CrudAction::CancelDelete => {
                self.state.deletion.cancel();
            }
            CrudAction::ClearMessages => {}
        }
    }
}

// Action handler implementations
impl<R: Resource> CrudManager<R> {
    /// Primary list and reference collections are fetched together; nothing
    /// is applied unless all of them succeed.
    async fn handle_load(&mut self) {
        self.state.set_loading(true);

        let backend = Arc::clone(&self.backend);
        let filter = self.state.filter.clone();
        let result = futures::try_join!(
            fetch_rows::<R>(backend.as_ref(), filter.as_ref()),
            ReferenceData::load(backend.as_ref(), R::REFERENCES),
        );

        match result {
            Ok((rows, references)) => {
                log::info!("✅ Loaded {} {}", rows.len(), R::PLURAL);
                self.state.rows = rows;
                self.state.references = references;
                self.state.loaded = true;
            }
            Err(e) => {
                log::error!("❌ Failed to load {}: {}", R::PLURAL, e);
                self.state
                    .set_error(format!("Failed to load {}: {}", R::PLURAL, e.user_message()));
            }
        }

        self.state.set_loading(false);
    }

    fn handle_open_edit(&mut self, id: EntityId) {
        match self.state.find(id).cloned() {
            Some(entity) => self.state.form.open_edit(entity),
            None => self
                .state
                .set_error(format!("No {} with id {} is loaded", R::NOUN, id)),
        }
    }

    async fn handle_submit(&mut self) {
        let editing = self.state.form.is_editing();
        self.state.set_loading(true);

        let backend = Arc::clone(&self.backend);
        let result = self.state.form.submit(backend.as_ref()).await;

        self.state.set_loading(false);

        match result {
            Ok(()) => {
                let verb = if editing { "updated" } else { "created" };
                log::info!("✅ {} {}", R::TITLE, verb);
                self.state.set_success(format!("{} {}", R::TITLE, verb));
                self.handle_load().await;
            }
            Err(e) => {
                log::error!("❌ Failed to save {}: {}", R::NOUN, e);
                self.state
                    .set_error(format!("Failed to save {}: {}", R::NOUN, e.user_message()));
            }
        }
    }

    fn handle_request_delete(&mut self, id: EntityId) {
        match self.state.find(id).cloned() {
            Some(entity) => self.state.deletion.request_delete(entity),
            None => self
                .state
                .set_error(format!("No {} with id {} is loaded", R::NOUN, id)),
        }
    }

    async fn handle_confirm_delete(&mut self) {
        self.state.set_loading(true);

        let backend = Arc::clone(&self.backend);
        let outcome = self.state.deletion.confirm(backend.as_ref()).await;

        self.state.set_loading(false);

        match outcome {
            None => log::warn!("ConfirmDelete with no pending {}", R::NOUN),
            Some(Ok(_)) => {
                log::info!("🗑️ {} deleted", R::TITLE);
                self.state.set_success(format!("{} deleted", R::TITLE));
                self.handle_load().await;
            }
            Some(Err(e)) => {
                log::error!("❌ Failed to delete {}: {}", R::NOUN, e);
                self.state
                    .set_error(format!("Failed to delete {}: {}", R::NOUN, e.user_message()));
            }
        }
    }
}

async fn fetch_rows<R: Resource>(
    backend: &dyn Backend,
    filter: Option<&ListFilter>,
) -> Result<Vec<R::Entity>, RemoteError> {
    let collection = Collection::<R::Entity>::new(backend);
    match filter {
        Some(filter) => collection.list_by(&filter.field, &filter.value).await,
        None => collection.list().await,
    }
}
