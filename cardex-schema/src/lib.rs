pub mod backend;
pub mod card;
pub mod envelope;
mod lax;

pub use backend::{Backend, UnknownBackend};
pub use card::{CardId, CardPayload, GraphicsCard};
pub use envelope::{ApiEnvelope, UNKNOWN_ERROR};
pub use lax::parse_calendar_date;
