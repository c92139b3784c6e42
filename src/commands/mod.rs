//! Command-line command handlers for auto-mode.
//!
//! The default action (`run`) switches the appearance; `--status` and `--init`
//! are one-shot helpers. Each command is implemented in its own submodule.

pub mod init;
pub mod run;
pub mod status;
