//! Client-side task store: an in-memory task list with injected key-value
//! persistence, mirroring the server's Task entity for local-only use.

pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{ClientError, ClientTask, Counts, TaskStore, TaskView};
