use crate::api::CatalogApi;
use crate::config::ClientConfig;
use crate::error::CardexError;
use crate::filter::FilterState;
use crate::form::CardForm;
use crate::render::{LOADING_HTML, error_html, grid_html};
use crate::state::{ModalMode, ModalSession, ModalTarget, UiState};
use crate::view::{CatalogView, ModalView, Notice};
use cardex_schema::{Backend, CardId, GraphicsCard};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this card?";

#[derive(Debug)]
pub enum LoadOutcome {
    Rendered(usize),
    /// The error block was rendered in place of the grid.
    Failed(CardexError),
    /// A newer load for the same backend was issued while this one was in flight.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Option<CardId>),
    Updated(CardId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

/// Per-tab state. The two tabs never share one.
#[derive(Default)]
struct TabState {
    filters: FilterState,
    /// Bumped by every `load_cards`.
    generation: u64,
    /// Bumped by every debounced search.
    search_ticket: u64,
    /// Cards currently shown, used to resolve edit/delete targets.
    shown: Vec<GraphicsCard>,
}

struct Inner<V> {
    api: CatalogApi,
    view: V,
    search_debounce: Duration,
    discard_stale_loads: bool,
    ui: Mutex<UiState>,
    tabs: [Mutex<TabState>; 2],
}

/// Drives the catalog UI: filters, loads, the card form and deletes.
///
/// Cloning is cheap and shares state; debounced searches run on a clone.
pub struct CatalogClient<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for CatalogClient<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<V: CatalogView> CatalogClient<V> {
    pub fn new(api: CatalogApi, view: V, cfg: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                view,
                search_debounce: cfg.search_debounce(),
                discard_stale_loads: cfg.discard_stale_loads,
                ui: Mutex::new(UiState::default()),
                tabs: [Mutex::default(), Mutex::default()],
            }),
        }
    }

    pub fn from_config(view: V, cfg: &ClientConfig) -> Result<Self, CardexError> {
        Ok(Self::new(CatalogApi::from_config(cfg)?, view, cfg))
    }

    pub fn view(&self) -> &V {
        &self.inner.view
    }

    fn tab(&self, backend: Backend) -> MutexGuard<'_, TabState> {
        lock(&self.inner.tabs[backend.index()])
    }

    /// Shows the active tab and loads both grids concurrently.
    pub async fn init(&self) -> [LoadOutcome; 2] {
        let active = lock(&self.inner.ui).active_backend;
        self.inner.view.show_tab(active);
        let (relational, document) = futures::future::join(
            self.load_cards(Backend::Relational, None),
            self.load_cards(Backend::Document, None),
        )
        .await;
        [relational, document]
    }

    pub fn ui_state(&self) -> UiState {
        lock(&self.inner.ui).clone()
    }

    pub fn switch_tab(&self, backend: Backend) {
        lock(&self.inner.ui).active_backend = backend;
        self.inner.view.show_tab(backend);
    }

    pub fn active_backend(&self) -> Backend {
        lock(&self.inner.ui).active_backend
    }

    pub fn filters(&self, backend: Backend) -> FilterState {
        self.tab(backend).filters.clone()
    }

    pub fn set_filters(&self, backend: Backend, filters: FilterState) {
        self.tab(backend).filters = filters;
    }

    pub fn update_filters<F>(&self, backend: Backend, f: F) -> Result<(), CardexError>
    where
        F: FnOnce(&mut FilterState) -> Result<(), CardexError>,
    {
        f(&mut self.tab(backend).filters)
    }

    /// Empties the filter inputs of `backend`. Does not reload.
    pub fn clear_filters(&self, backend: Backend) {
        let mut tab = self.tab(backend);
        tab.filters.clear();
        self.inner.view.sync_filters(backend, &tab.filters);
    }

    /// Cards currently rendered for `backend`.
    pub fn shown_cards(&self, backend: Backend) -> Vec<GraphicsCard> {
        self.tab(backend).shown.clone()
    }

    pub fn shown_card(&self, backend: Backend, id: &CardId) -> Option<GraphicsCard> {
        self.tab(backend)
            .shown
            .iter()
            .find(|card| &card.id == id)
            .cloned()
    }

    /// Fetches and renders `backend`'s grid.
    ///
    /// `Some(filters)` replaces the stored filters first; `None` uses them as
    /// they are. A response overtaken by a newer load of the same backend is
    /// dropped when stale discarding is on, otherwise the last response to
    /// arrive wins.
    pub async fn load_cards(&self, backend: Backend, filters: Option<FilterState>) -> LoadOutcome {
        let (generation, filters) = {
            let mut tab = self.tab(backend);
            if let Some(filters) = filters {
                tab.filters = filters;
            }
            tab.generation += 1;
            self.inner.view.render_grid(backend, LOADING_HTML);
            (tab.generation, tab.filters.clone())
        };

        let result = self.inner.api.list_cards(backend, &filters).await;

        let mut tab = self.tab(backend);
        if self.inner.discard_stale_loads && generation != tab.generation {
            debug!(
                %backend,
                generation,
                latest = tab.generation,
                "Discarding stale card list"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(cards) => {
                let count = cards.len();
                self.inner
                    .view
                    .render_grid(backend, &grid_html(backend, &cards));
                tab.shown = cards;
                debug!(%backend, count, "Rendered card grid");
                LoadOutcome::Rendered(count)
            }
            Err(err) => {
                warn!(%backend, error = %err, "Failed to load cards");
                let message = match &err {
                    CardexError::Application(message) => message.clone(),
                    other => format!("Failed to load cards: {}", other.user_message()),
                };
                self.inner.view.render_grid(backend, &error_html(&message));
                tab.shown.clear();
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Renders `cards` into `backend`'s grid without touching the network.
    pub fn render_grid(&self, backend: Backend, cards: Vec<GraphicsCard>) {
        let mut tab = self.tab(backend);
        self.inner
            .view
            .render_grid(backend, &grid_html(backend, &cards));
        tab.shown = cards;
    }

    pub async fn apply_filters(&self, backend: Backend) -> LoadOutcome {
        self.load_cards(backend, None).await
    }

    /// Applies filters after the search debounce. A later call for the same
    /// backend within the window supersedes this one, whose task then
    /// resolves to `None` without issuing a request.
    pub fn apply_filters_debounced(&self, backend: Backend) -> JoinHandle<Option<LoadOutcome>> {
        let ticket = {
            let mut tab = self.tab(backend);
            tab.search_ticket += 1;
            tab.search_ticket
        };
        let this = self.clone();
        let delay = self.inner.search_debounce;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if this.tab(backend).search_ticket != ticket {
                return None;
            }
            Some(this.apply_filters(backend).await)
        })
    }

    /// Binds the shared form to a new create/edit session, replacing any open one.
    pub fn open_modal(&self, backend: Backend, target: ModalTarget) {
        let (mode, form) = match target {
            ModalTarget::Create => (ModalMode::Create, CardForm::default()),
            ModalTarget::Edit(card) => {
                let form = CardForm::from_card(&card);
                (ModalMode::Edit(card.id), form)
            }
        };
        let session = ModalSession {
            backend,
            mode,
            form,
        };

        let mut ui = lock(&self.inner.ui);
        self.inner.view.show_modal(ModalView {
            title: session.title(),
            backend,
            card_id: session.card_id(),
            form: &session.form,
        });
        ui.modal = Some(session);
    }

    /// Opens the edit form for a card currently shown in `backend`'s grid.
    pub fn open_edit(&self, backend: Backend, id: &CardId) -> Result<(), CardexError> {
        let card = self.shown_card(backend, id).ok_or_else(|| {
            CardexError::Validation(format!("card `{id}` is not shown in the {backend} tab"))
        })?;
        self.open_modal(backend, ModalTarget::Edit(card));
        Ok(())
    }

    pub fn close_modal(&self) {
        lock(&self.inner.ui).modal = None;
        self.inner.view.hide_modal();
    }

    pub fn form(&self) -> Option<CardForm> {
        lock(&self.inner.ui)
            .modal
            .as_ref()
            .map(|session| session.form.clone())
    }

    pub fn update_form<F>(&self, f: F) -> Result<(), CardexError>
    where
        F: FnOnce(&mut CardForm) -> Result<(), CardexError>,
    {
        let mut ui = lock(&self.inner.ui);
        let session = ui
            .modal
            .as_mut()
            .ok_or_else(|| CardexError::Validation("no card form is open".to_string()))?;
        f(&mut session.form)
    }

    /// Sends the open form as a create or update.
    ///
    /// On success the modal closes, the grid reloads and a notice is shown.
    /// On failure the error is shown and the session stays as it was.
    pub async fn submit_form(&self) -> Result<SubmitOutcome, CardexError> {
        let Some(session) = lock(&self.inner.ui).modal.clone() else {
            let err = CardexError::Validation("no card form is open".to_string());
            self.inner.view.notify(Notice::Error(err.user_message()));
            return Err(err);
        };

        match self.send_form(&session).await {
            Ok(outcome) => {
                self.close_modal();
                self.load_cards(session.backend, None).await;
                let verb = match outcome {
                    SubmitOutcome::Created(_) => "created",
                    SubmitOutcome::Updated(_) => "updated",
                };
                info!(backend = %session.backend, ?outcome, "Card {verb}");
                self.inner
                    .view
                    .notify(Notice::Success(format!("Card {verb} successfully!")));
                Ok(outcome)
            }
            Err(err) => {
                warn!(backend = %session.backend, error = %err, "Failed to save card");
                self.inner
                    .view
                    .notify(Notice::Error(failure_notice("Failed to save card", &err)));
                Err(err)
            }
        }
    }

    async fn send_form(&self, session: &ModalSession) -> Result<SubmitOutcome, CardexError> {
        let payload = session.form.to_payload()?;
        match &session.mode {
            ModalMode::Create => self
                .inner
                .api
                .create_card(session.backend, &payload)
                .await
                .map(SubmitOutcome::Created),
            ModalMode::Edit(id) => {
                self.inner
                    .api
                    .update_card(session.backend, id, &payload)
                    .await?;
                Ok(SubmitOutcome::Updated(id.clone()))
            }
        }
    }

    /// Deletes after the view confirms. A declined prompt sends nothing and
    /// leaves the grid alone, as does a failed delete.
    pub async fn delete_card(
        &self,
        backend: Backend,
        id: &CardId,
    ) -> Result<DeleteOutcome, CardexError> {
        if !self.inner.view.confirm(DELETE_PROMPT).await {
            debug!(%backend, %id, "Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        match self.inner.api.delete_card(backend, id).await {
            Ok(()) => {
                self.load_cards(backend, None).await;
                info!(%backend, %id, "Card deleted");
                self.inner
                    .view
                    .notify(Notice::Success("Card deleted successfully!".to_string()));
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                warn!(%backend, %id, error = %err, "Failed to delete card");
                self.inner
                    .view
                    .notify(Notice::Error(failure_notice("Failed to delete card", &err)));
                Err(err)
            }
        }
    }
}

fn failure_notice(context: &str, err: &CardexError) -> String {
    match err {
        CardexError::Application(message) => format!("Error: {message}"),
        other => format!("{context}: {}", other.user_message()),
    }
}
