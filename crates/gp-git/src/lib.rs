//! External process integration for gitpulse.
//!
//! Provides:
//! - [`ProcessInvoker`]: run a command synchronously and capture its output
//! - [`Git`]: the history query plus pull/clone for keeping checkouts current

mod git;
mod process;

pub use git::{DEFAULT_GIT_PROGRAM, Git};
pub use process::{ProcessError, ProcessInvoker, SystemInvoker};
