//! Line-oriented driver used by the `cardex` binary.

mod command;
mod view;

pub use command::{Command, HELP};
pub use view::{TerminalView, read_stdin_line};
