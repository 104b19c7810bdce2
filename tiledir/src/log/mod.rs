//! Injected diagnostics for the pyramid walk.
//!
//! The library never touches process-wide logging state on its own. Anything
//! that reports progress takes an `Arc<dyn Logger>`, normally the one carried
//! by [`RunConfig`](crate::pyramid::RunConfig).
//!
//! - [`TracingLogger`] forwards to the `tracing` subscriber the binary set up
//! - [`NoOpLogger`] discards everything
//! - [`MemoryLogger`] keeps messages for assertions in tests
//!
//! ```
//! use tiledir::log::{Logger, NoOpLogger};
//! use tiledir::log_info;
//! use std::sync::Arc;
//!
//! let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
//! log_info!(logger, "visited {} tiles", 12);
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::MemoryLogger;
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
