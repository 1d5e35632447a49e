//! Interactive text console
//!
//! Reads one command per line, dispatches it through the
//! [`SessionController`](crate::application::SessionController) and prints
//! the slot board, receipts and error messages.

pub mod parser;
pub mod render;
mod repl;

pub use parser::{parse_command, Command};
pub use repl::run;
