// Workspace module - sandbox boundary for files and the process working directory
#![allow(unused_imports)]

pub mod error;
pub mod guard;
pub mod workdir;

pub use error::{Result, WorkspaceError};
pub use guard::WorkspaceGuard;
pub use workdir::WorkdirGuard;
