use crate::form::CardForm;
use cardex_schema::{Backend, CardId, GraphicsCard};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "card_id", rename_all = "snake_case")]
pub enum ModalMode {
    Create,
    Edit(CardId),
}

/// What `open_modal` should bind the form to.
#[derive(Debug, Clone)]
pub enum ModalTarget {
    Create,
    Edit(GraphicsCard),
}

/// One open create/edit form. Opening another replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalSession {
    pub backend: Backend,
    pub mode: ModalMode,
    pub form: CardForm,
}

impl ModalSession {
    pub fn title(&self) -> &'static str {
        match self.mode {
            ModalMode::Create => "Add New Graphics Card",
            ModalMode::Edit(_) => "Edit Graphics Card",
        }
    }

    pub fn card_id(&self) -> Option<&CardId> {
        match &self.mode {
            ModalMode::Create => None,
            ModalMode::Edit(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub active_backend: Backend,
    /// `None` while the modal is closed.
    pub modal: Option<ModalSession>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_backend: Backend::Relational,
            modal: None,
        }
    }
}

impl UiState {
    pub fn editing_card_id(&self) -> Option<&CardId> {
        self.modal.as_ref().and_then(ModalSession::card_id)
    }
}
