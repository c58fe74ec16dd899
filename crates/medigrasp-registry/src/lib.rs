//! Medigrasp Registry
//!
//! The task registry accepts recognition and grasp jobs, runs each on its own
//! spawned tokio task, and serves status/result/error queries and deletions
//! by task id. Submission never blocks on the job itself; the registry's
//! bookkeeping stays responsive while tasks run.
//!
//! Task records move `Pending -> Processing -> {Completed, Failed}` and never
//! backward. Deletion is rejected while a record is non-terminal. At most one
//! grasp task may be in flight at a time, which keeps the shared medicine
//! list's selection invariant trivial.

mod error;
mod registry;
mod types;

pub use error::RegistryError;
pub use registry::{SubmitOptions, TaskRegistry};
pub use types::{TaskAction, TaskRecord, TaskStatus};
