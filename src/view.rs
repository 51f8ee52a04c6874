use crate::filter::FilterState;
use crate::form::CardForm;
use async_trait::async_trait;
use cardex_schema::{Backend, CardId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Error(text) => text,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModalView<'a> {
    pub title: &'static str,
    pub backend: Backend,
    pub card_id: Option<&'a CardId>,
    pub form: &'a CardForm,
}

/// Where the controller's output lands: a page, a terminal, a test recorder.
///
/// Calls are made while controller state is locked, so implementations must
/// not call back into the controller from these methods.
///
/// Every method except [`CatalogView::confirm`] is synchronous and runs on an
/// async runtime worker under that lock. It must return promptly: no blocking
/// reads, no network round trips, nothing that waits on another task. Small
/// local writes are acceptable; anything slower belongs behind a channel or
/// `spawn_blocking`.
#[async_trait]
pub trait CatalogView: Send + Sync + 'static {
    /// Highlight `backend`'s tab and show its panel.
    fn show_tab(&self, backend: Backend);

    /// Replace the grid body of `backend` with `html`.
    fn render_grid(&self, backend: Backend, html: &str);

    fn show_modal(&self, modal: ModalView<'_>);

    fn hide_modal(&self);

    /// Push filter values back into the inputs (after a clear).
    fn sync_filters(&self, backend: Backend, filters: &FilterState);

    fn notify(&self, notice: Notice);

    /// Yes/no question; `false` aborts the action. Awaited outside any lock,
    /// so it may wait on the user for as long as it takes.
    async fn confirm(&self, prompt: &str) -> bool;
}
