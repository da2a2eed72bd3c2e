//! Refresh requests and the worker-side drain
//!
//! Producers describe what changed with a [`RefreshRequest`]; the display
//! worker drains the [`RefreshQueue`] in FIFO order and drives the panel.

mod queue;
mod request;
mod scheduler;

pub use queue::{RefreshError, RefreshQueue, REFRESH_QUEUE_CAPACITY};
pub use request::{RefreshMode, RefreshRequest};
pub use scheduler::{drain, execute, BatchReport};
