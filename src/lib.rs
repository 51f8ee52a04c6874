pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod form;
pub mod render;
pub mod state;
pub mod terminal;
pub mod view;

mod utils;

pub use cardex_schema::{Backend, CardId, CardPayload, GraphicsCard};
pub use controller::{CatalogClient, DeleteOutcome, LoadOutcome, SubmitOutcome};
pub use error::CardexError;
pub use filter::FilterState;
pub use form::CardForm;
pub use state::{ModalMode, ModalSession, ModalTarget, UiState};
pub use view::{CatalogView, ModalView, Notice};
