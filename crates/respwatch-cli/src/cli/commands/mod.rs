//! CLI command handlers. Each command is in its own file.

mod check;
mod completions;
mod man;
mod run;

pub use check::run_check;
pub use completions::run_completions;
pub use man::run_man;
pub use run::run_poll;
