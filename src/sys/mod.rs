mod procfs;
mod types;

pub use procfs::{ProcFs, ProcfsConfig, VanishedPolicy, DEFAULT_PROC_ROOT};
pub use types::{ProcError, ProcessId, Result};
